use serde::{Deserialize, Serialize};

pub const DEFAULT_EV_RANGE_KM: f64 = 300.0;
pub const DEFAULT_VEHICLE_ID: &str = "generic";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvModel {
    pub id: String,
    pub name: String,
    /// Rated range on a full battery.
    pub range_km: f64,
    pub battery_kwh: f64,
}

impl EvModel {
    fn new(id: &str, name: &str, range_km: f64, battery_kwh: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            range_km,
            battery_kwh,
        }
    }

    pub fn consumption_kwh_per_km(&self) -> f64 {
        self.battery_kwh / self.range_km
    }
}

/// Built-in model list; the first entry is the default selection.
pub fn catalog() -> Vec<EvModel> {
    vec![
        EvModel::new(DEFAULT_VEHICLE_ID, "Generic EV", DEFAULT_EV_RANGE_KM, 50.0),
        EvModel::new("tata-nexon-ev", "Tata Nexon EV", 312.0, 30.2),
        EvModel::new("mg-zs-ev", "MG ZS EV", 419.0, 50.3),
        EvModel::new("hyundai-kona-electric", "Hyundai Kona Electric", 452.0, 39.2),
        EvModel::new("tesla-model-3", "Tesla Model 3", 491.0, 57.5),
        EvModel::new("nissan-leaf", "Nissan Leaf", 270.0, 40.0),
        EvModel::new("vw-id3", "Volkswagen ID.3", 426.0, 58.0),
    ]
}

#[test]
fn catalog_test() {
    let models = catalog();

    assert_eq!(models[0].id, DEFAULT_VEHICLE_ID);
    assert_eq!(models[0].range_km, DEFAULT_EV_RANGE_KM);
    assert!(models.iter().all(|m| m.range_km > 0.0 && m.battery_kwh > 0.0));

    let mut ids: Vec<&str> = models.iter().map(|m| m.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), models.len());
}
