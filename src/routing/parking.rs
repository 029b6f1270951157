//! The portal's route table.

use crate::routing::route::RouteDescriptor;
use crate::routing::table::{RouteError, RouteTable};

/// Login / registration page. Also the guard's redirect target.
pub const LOGIN_AND_REGISTER: &str = "loginandregister";
/// Root layout owning the parking views.
pub const LAYOUT: &str = "layout";
pub const PARKING_DISCOVERY_NEW: &str = "ParkingDiscoveryNew";
pub const DATA_INSIGHTS: &str = "DataInsights";

/// Where `/` lands.
pub const DEFAULT_PATH: &str = "/parking-discovery-new";

/// Route descriptors, nested under the root layout.
pub fn routes() -> Vec<RouteDescriptor> {
    vec![
        RouteDescriptor::lazy("/LoginAndRegister", LOGIN_AND_REGISTER, "System/LoginAndRegister"),
        RouteDescriptor::lazy("/", LAYOUT, "layout/layout")
            .with_redirect(DEFAULT_PATH)
            .with_children(vec![
                RouteDescriptor::new("parking-discovery-new", PARKING_DISCOVERY_NEW, "Parking/ParkingDiscoveryNew"),
                RouteDescriptor::new("data-insights", DATA_INSIGHTS, "Parking/DataInsights"),
            ]),
    ]
}

impl RouteTable {
    /// The compiled portal table.
    pub fn parking() -> Result<Self, RouteError> {
        RouteTable::new(routes())
    }
}
