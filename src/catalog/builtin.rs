use crate::catalog::ReferenceData;
use crate::core::{
    InfrastructureProject, Level, RouteEndpoint, RouteStatus, Supplier, SupplierStatus,
    TransportMode, TransportRoute, Trend,
};
use crate::geo::GeoPoint;

/// Hand-authored sample network used by the dashboard and the CLI when no
/// catalog file is given.
pub fn builtin_catalog() -> ReferenceData {
    ReferenceData {
        suppliers: vec![
            supplier(
                "sup-tw-001",
                "Taiwan Semiconductor Components",
                1,
                (25.03, 121.57),
                "TW",
                &["semiconductors", "electronics"],
                87.0,
                SupplierStatus::Critical,
                Level::High,
                Trend::Up,
            ),
            supplier(
                "sup-kr-004",
                "Busan Steel Works",
                1,
                (35.18, 129.08),
                "KR",
                &["steel"],
                38.0,
                SupplierStatus::OnTrack,
                Level::Medium,
                Trend::Stable,
            ),
            supplier(
                "sup-de-005",
                "Rhine Industrial Components",
                1,
                (50.94, 6.96),
                "DE",
                &["machinery", "steel"],
                28.0,
                SupplierStatus::OnTrack,
                Level::Low,
                Trend::Down,
            ),
            supplier(
                "sup-mx-010",
                "Monterrey Assembly",
                1,
                (25.69, -100.32),
                "MX",
                &["electronics", "assemblies"],
                55.0,
                SupplierStatus::AtRisk,
                Level::Medium,
                Trend::Stable,
            ),
            supplier(
                "sup-cn-002",
                "Shenzhen Precision Electronics",
                2,
                (22.54, 114.06),
                "CN",
                &["electronics", "circuit boards"],
                72.0,
                SupplierStatus::AtRisk,
                Level::High,
                Trend::Up,
            ),
            supplier(
                "sup-jp-003",
                "Osaka Specialty Materials",
                2,
                (34.69, 135.50),
                "JP",
                &["rare earth alloys", "chemicals"],
                45.0,
                SupplierStatus::OnTrack,
                Level::Medium,
                Trend::Stable,
            ),
            supplier(
                "sup-us-006",
                "Gulf Coast Polymers",
                2,
                (29.76, -95.37),
                "US",
                &["polymers", "chemicals"],
                64.0,
                SupplierStatus::AtRisk,
                Level::Medium,
                Trend::Up,
            ),
            supplier(
                "sup-vn-007",
                "Haiphong Cable Manufacturing",
                3,
                (20.84, 106.69),
                "VN",
                &["copper cable"],
                58.0,
                SupplierStatus::AtRisk,
                Level::Medium,
                Trend::Stable,
            ),
            supplier(
                "sup-cl-008",
                "Atacama Copper Mining",
                3,
                (-23.65, -70.40),
                "CL",
                &["copper"],
                52.0,
                SupplierStatus::AtRisk,
                Level::Medium,
                Trend::Up,
            ),
            supplier(
                "sup-au-009",
                "Pilbara Lithium",
                3,
                (-20.31, 118.58),
                "AU",
                &["lithium"],
                41.0,
                SupplierStatus::OnTrack,
                Level::Low,
                Trend::Stable,
            ),
        ],
        routes: vec![
            route(
                "rt-001",
                ("Kaohsiung", (22.62, 120.30)),
                ("Los Angeles", (33.74, -118.27)),
                TransportMode::Sea,
                68.0,
                RouteStatus::Delayed,
                &["semiconductors", "electronics"],
            ),
            route(
                "rt-002",
                ("Shanghai", (31.23, 121.47)),
                ("Rotterdam", (51.92, 4.48)),
                TransportMode::Sea,
                55.0,
                RouteStatus::Operational,
                &["electronics", "machinery"],
            ),
            route(
                "rt-003",
                ("Taoyuan", (25.08, 121.23)),
                ("Anchorage", (61.17, -149.99)),
                TransportMode::Air,
                42.0,
                RouteStatus::Operational,
                &["semiconductors"],
            ),
            route(
                "rt-004",
                ("Busan", (35.10, 129.04)),
                ("Seattle", (47.60, -122.34)),
                TransportMode::Sea,
                35.0,
                RouteStatus::Operational,
                &["steel"],
            ),
            route(
                "rt-005",
                ("Houston", (29.76, -95.37)),
                ("Monterrey", (25.69, -100.32)),
                TransportMode::Road,
                30.0,
                RouteStatus::Operational,
                &["polymers"],
            ),
            route(
                "rt-006",
                ("Antofagasta", (-23.65, -70.40)),
                ("Shanghai", (31.23, 121.47)),
                TransportMode::Sea,
                47.0,
                RouteStatus::Operational,
                &["copper"],
            ),
            route(
                "rt-007",
                ("Duisburg", (51.43, 6.76)),
                ("Chongqing", (29.56, 106.55)),
                TransportMode::Rail,
                60.0,
                RouteStatus::Disrupted,
                &["machinery"],
            ),
        ],
        projects: vec![
            project(
                "prj-001",
                "Pacific Data Center Expansion",
                (37.39, -122.08),
                "US",
                &["semiconductors", "electronics"],
                420_000_000.0,
            ),
            project(
                "prj-002",
                "North Sea Offshore Wind Array",
                (55.00, 3.00),
                "UK",
                &["steel", "copper cable", "machinery"],
                1_100_000_000.0,
            ),
            project(
                "prj-003",
                "Gulf Coast LNG Terminal",
                (29.70, -93.90),
                "US",
                &["steel", "polymers", "chemicals"],
                750_000_000.0,
            ),
            project(
                "prj-004",
                "Sydney Metro Extension",
                (-33.87, 151.21),
                "AU",
                &["steel", "copper cable", "electronics"],
                2_300_000_000.0,
            ),
        ],
    }
}

#[allow(clippy::too_many_arguments)]
fn supplier(
    id: &str,
    name: &str,
    tier: u8,
    (lat, lng): (f64, f64),
    country: &str,
    materials: &[&str],
    risk_score: f64,
    status: SupplierStatus,
    impact: Level,
    trend: Trend,
) -> Supplier {
    Supplier {
        id: id.to_string(),
        name: name.to_string(),
        tier,
        location: GeoPoint::new(lat, lng),
        country: country.to_string(),
        materials: strings(materials),
        risk_score,
        status,
        impact,
        trend,
    }
}

fn route(
    id: &str,
    (origin, (olat, olng)): (&str, (f64, f64)),
    (destination, (dlat, dlng)): (&str, (f64, f64)),
    mode: TransportMode,
    risk_score: f64,
    status: RouteStatus,
    materials: &[&str],
) -> TransportRoute {
    TransportRoute {
        id: id.to_string(),
        origin: RouteEndpoint {
            name: origin.to_string(),
            location: GeoPoint::new(olat, olng),
        },
        destination: RouteEndpoint {
            name: destination.to_string(),
            location: GeoPoint::new(dlat, dlng),
        },
        mode,
        risk_score,
        status,
        materials: strings(materials),
    }
}

fn project(
    id: &str,
    name: &str,
    (lat, lng): (f64, f64),
    country: &str,
    required_materials: &[&str],
    budget: f64,
) -> InfrastructureProject {
    InfrastructureProject {
        id: id.to_string(),
        name: name.to_string(),
        location: GeoPoint::new(lat, lng),
        country: country.to_string(),
        required_materials: strings(required_materials),
        budget,
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
