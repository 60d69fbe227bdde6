//! Virtual machine operations

use crate::{
    descriptor::Descriptor,
    field::{Container, Field},
};
use std::net::IpAddr;

/// Lists virtual machines
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ListVirtualMachines {
    pub account: String,
    pub domain_id: String,
    pub for_virtual_network: Option<bool>,
    pub group_id: String,
    pub id: String,
    pub ids: Vec<String>,
    pub is_recursive: bool,
    pub keyword: String,
    pub list_all: bool,
    pub name: String,
    pub network_id: String,
    pub page: i32,
    pub page_size: i32,
    pub state: String,
    pub template_id: String,
    pub zone_id: String,
}

impl Descriptor for ListVirtualMachines {
    fn api_name(&self) -> &'static str {
        "listVirtualMachines"
    }

    fn about(&self) -> &'static str {
        "List the virtual machines owned by the account"
    }

    fn fields(&mut self) -> Vec<Field<'_>> {
        vec![
            Field::new("Account", &mut self.account)
                .optional()
                .doc("list resources by account. Must be used with the domainId parameter."),
            Field::new("DomainID", &mut self.domain_id)
                .optional()
                .doc("list only resources belonging to the domain specified"),
            Field::new("ForVirtualNetwork", &mut self.for_virtual_network)
                .optional()
                .doc("list by network type; true if need to list vms using Virtual Network, false otherwise"),
            Field::new("GroupID", &mut self.group_id)
                .optional()
                .doc("the group ID"),
            Field::new("ID", &mut self.id)
                .optional()
                .doc("the ID of the virtual machine"),
            Field::new("IDs", &mut self.ids)
                .optional()
                .doc("the IDs of the virtual machines, mutually exclusive with id"),
            Field::new("IsRecursive", &mut self.is_recursive)
                .optional()
                .doc("defaults to false, but if true, lists all resources from the parent specified by the domainId till leaves."),
            Field::new("Keyword", &mut self.keyword)
                .optional()
                .doc("List by keyword"),
            Field::new("ListAll", &mut self.list_all)
                .optional()
                .doc("If set to false, list only resources belonging to the command's caller; if set to true - list resources that the caller is authorized to see. Default value is false"),
            Field::new("Name", &mut self.name)
                .optional()
                .doc("name of the virtual machine"),
            Field::new("NetworkID", &mut self.network_id)
                .optional()
                .doc("list by network id"),
            Field::new("Page", &mut self.page).optional(),
            Field::new("PageSize", &mut self.page_size).optional(),
            Field::new("State", &mut self.state)
                .optional()
                .doc("state of the virtual machine"),
            Field::unsupported("Tags", Container::List)
                .optional()
                .doc("List resources by tags (key/value pairs)"),
            Field::new("TemplateID", &mut self.template_id)
                .optional()
                .doc("list vms by template"),
            Field::new("ZoneID", &mut self.zone_id)
                .optional()
                .doc("the availability zone ID"),
        ]
    }
}

/// Creates and automatically starts a virtual machine
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DeployVirtualMachine {
    pub service_offering_id: String,
    pub template_id: String,
    pub zone_id: String,
    pub display_name: String,
    pub group: String,
    pub ip_address: Option<IpAddr>,
    pub ip6_address: Option<IpAddr>,
    pub key_pair: String,
    pub name: String,
    pub network_ids: Vec<String>,
    pub root_disk_size: i64,
    pub security_group_ids: Vec<String>,
    pub size: i64,
    pub start_vm: Option<bool>,
    pub user_data: String,
}

impl Descriptor for DeployVirtualMachine {
    fn api_name(&self) -> &'static str {
        "deployVirtualMachine"
    }

    fn is_async(&self) -> bool {
        true
    }

    fn about(&self) -> &'static str {
        "Creates and automatically starts a virtual machine based on a service offering, disk offering, and template."
    }

    fn fields(&mut self) -> Vec<Field<'_>> {
        vec![
            Field::new("ServiceOfferingID", &mut self.service_offering_id)
                .doc("the ID of the service offering for the virtual machine"),
            Field::new("TemplateID", &mut self.template_id)
                .doc("the ID of the template for the virtual machine"),
            Field::new("ZoneID", &mut self.zone_id)
                .doc("availability zone for the virtual machine"),
            Field::unsupported("Details", Container::Map)
                .optional()
                .doc("used to specify the custom parameters."),
            Field::new("DisplayName", &mut self.display_name)
                .optional()
                .doc("an optional user generated name for the virtual machine"),
            Field::new("Group", &mut self.group)
                .optional()
                .doc("an optional group for the virtual machine"),
            Field::new("IPAddress", &mut self.ip_address)
                .optional()
                .doc("the ip address for default vm's network"),
            Field::new("IP6Address", &mut self.ip6_address)
                .optional()
                .doc("the ipv6 address for default vm's network"),
            Field::new("KeyPair", &mut self.key_pair)
                .optional()
                .doc("name of the ssh key pair used to login to the virtual machine"),
            Field::new("Name", &mut self.name)
                .optional()
                .doc("host name for the virtual machine"),
            Field::new("NetworkIDs", &mut self.network_ids)
                .optional()
                .doc("list of network ids used by virtual machine. Can't be specified with ipToNetworkList parameter"),
            Field::new("RootDiskSize", &mut self.root_disk_size)
                .optional()
                .doc("Optional field to resize root disk on deploy. Value is in GB. Only applies to template-based deployments."),
            Field::new("SecurityGroupIDs", &mut self.security_group_ids)
                .optional()
                .doc("comma separated list of security groups id that going to be applied to the virtual machine."),
            Field::new("Size", &mut self.size)
                .optional()
                .doc("the arbitrary size for the DATADISK volume. Mutually exclusive with diskOfferingId"),
            Field::new("StartVM", &mut self.start_vm)
                .optional()
                .doc("true if start vm after creating; defaulted to true if not specified"),
            Field::new("UserData", &mut self.user_data)
                .optional()
                .doc("an optional binary data that can be sent to the virtual machine upon a successful deployment."),
        ]
    }
}

/// Destroys a virtual machine
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DestroyVirtualMachine {
    pub id: String,
    pub expunge: Option<bool>,
}

impl Descriptor for DestroyVirtualMachine {
    fn api_name(&self) -> &'static str {
        "destroyVirtualMachine"
    }

    fn is_async(&self) -> bool {
        true
    }

    fn about(&self) -> &'static str {
        "Destroys a virtual machine."
    }

    fn fields(&mut self) -> Vec<Field<'_>> {
        vec![
            Field::new("ID", &mut self.id).doc("The ID of the virtual machine"),
            Field::new("Expunge", &mut self.expunge)
                .optional()
                .doc("If true is passed, the vm is expunged immediately. False by default."),
        ]
    }
}

/// Starts a virtual machine
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StartVirtualMachine {
    pub id: String,
    pub host_id: String,
}

impl Descriptor for StartVirtualMachine {
    fn api_name(&self) -> &'static str {
        "startVirtualMachine"
    }

    fn is_async(&self) -> bool {
        true
    }

    fn about(&self) -> &'static str {
        "Starts a virtual machine."
    }

    fn fields(&mut self) -> Vec<Field<'_>> {
        vec![
            Field::new("ID", &mut self.id).doc("The ID of the virtual machine"),
            Field::new("HostID", &mut self.host_id)
                .optional()
                .doc("destination Host ID to deploy the VM to - parameter available for root admin only"),
        ]
    }
}

/// Stops a virtual machine
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StopVirtualMachine {
    pub id: String,
    pub forced: Option<bool>,
}

impl Descriptor for StopVirtualMachine {
    fn api_name(&self) -> &'static str {
        "stopVirtualMachine"
    }

    fn is_async(&self) -> bool {
        true
    }

    fn about(&self) -> &'static str {
        "Stops a virtual machine."
    }

    fn fields(&mut self) -> Vec<Field<'_>> {
        vec![
            Field::new("ID", &mut self.id).doc("The ID of the virtual machine"),
            Field::new("Forced", &mut self.forced)
                .optional()
                .doc("Force stop the VM (vm is marked as Stopped even when command fails to be send to the backend).  The caller knows the VM is stopped."),
        ]
    }
}

/// Reboots a virtual machine
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RebootVirtualMachine {
    pub id: String,
}

impl Descriptor for RebootVirtualMachine {
    fn api_name(&self) -> &'static str {
        "rebootVirtualMachine"
    }

    fn is_async(&self) -> bool {
        true
    }

    fn about(&self) -> &'static str {
        "Reboots a virtual machine."
    }

    fn fields(&mut self) -> Vec<Field<'_>> {
        vec![Field::new("ID", &mut self.id).doc("The ID of the virtual machine")]
    }
}
