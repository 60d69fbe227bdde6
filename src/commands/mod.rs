use crate::dispatcher::Registry;

pub mod call;
pub mod check;

/// Usage text listing every registered command
pub fn usage(program: &str, registry: &Registry) -> String {
    let commands: String = registry.names().map(|name| format!("  {name}\n")).collect();
    format!(
        "Usage:\n\n  {program} [OPTIONS] <command> [--flag value ...]\n\n\
         Available commands:\n\n\
         {commands}\n\
         no command found\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::registry;

    #[test]
    fn usage_lists_operation_names() {
        let text = usage("cs", &registry());
        assert!(text.contains("  cs [OPTIONS] <command>"));
        assert!(text.contains("  listZones\n"));
        assert!(text.contains("  deployVirtualMachine\n"));
        assert!(text.ends_with("no command found\n"));
    }
}
