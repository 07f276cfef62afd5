pub mod appointment;
pub mod options;
pub mod shared_schedule;
pub mod slot;

/// Join tables linking a shared schedule to the options it offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Association {
    Services,
    Locations,
    Companies,
}

impl Association {
    pub const ALL: [Association; 3] = [Association::Services, Association::Locations, Association::Companies];

    pub fn join_table(self) -> &'static str {
        match self {
            Association::Services => "shared_schedule_services",
            Association::Locations => "shared_schedule_locations",
            Association::Companies => "shared_schedule_companies",
        }
    }

    pub fn option_table(self) -> &'static str {
        match self {
            Association::Services => "services",
            Association::Locations => "locations",
            Association::Companies => "billing_companies",
        }
    }

    pub fn id_column(self) -> &'static str {
        match self {
            Association::Services => "service_id",
            Association::Locations => "location_id",
            Association::Companies => "company_id",
        }
    }
}
