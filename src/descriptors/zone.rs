use crate::{
    descriptor::Descriptor,
    field::{Container, Field},
};

/// Lists zones
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ListZones {
    pub available: Option<bool>,
    pub domain_id: String,
    pub id: String,
    pub keyword: String,
    pub name: String,
    pub page: i32,
    pub page_size: i32,
    pub show_capacities: Option<bool>,
}

impl Descriptor for ListZones {
    fn api_name(&self) -> &'static str {
        "listZones"
    }

    fn about(&self) -> &'static str {
        "Lists zones"
    }

    fn fields(&mut self) -> Vec<Field<'_>> {
        vec![
            Field::new("Available", &mut self.available)
                .optional()
                .doc("true if you want to retrieve all available Zones. False if you only want to return the Zones from which you have at least one VM. Default is false."),
            Field::new("DomainID", &mut self.domain_id)
                .optional()
                .doc("the ID of the domain associated with the zone"),
            Field::new("ID", &mut self.id).optional().doc("the ID of the zone"),
            Field::new("Keyword", &mut self.keyword)
                .optional()
                .doc("List by keyword"),
            Field::new("Name", &mut self.name)
                .optional()
                .doc("the name of the zone"),
            Field::new("Page", &mut self.page).optional(),
            Field::new("PageSize", &mut self.page_size).optional(),
            Field::new("ShowCapacities", &mut self.show_capacities)
                .optional()
                .doc("flag to display the capacity of the zones"),
            Field::unsupported("Tags", Container::List)
                .optional()
                .doc("List zones by resource tags (key/value pairs)"),
        ]
    }
}
