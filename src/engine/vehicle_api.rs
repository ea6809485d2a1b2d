use super::Engine;

use async_trait::async_trait;

use crate::{
    api::VehicleAPI,
    entities::EvModel,
    error::{unknown_vehicle_error, Error},
};

#[async_trait]
impl VehicleAPI for Engine {
    async fn list_vehicles(&self) -> Result<Vec<EvModel>, Error> {
        Ok(self.vehicles.clone())
    }

    #[tracing::instrument(skip(self))]
    async fn find_vehicle(&self, id: &str) -> Result<EvModel, Error> {
        self.vehicles
            .iter()
            .find(|vehicle| vehicle.id.eq_ignore_ascii_case(id.trim()))
            .cloned()
            .ok_or_else(|| unknown_vehicle_error(id))
    }
}

#[test]
fn find_vehicle_test() {
    use tokio_test::block_on;

    let engine = super::fakes::engine();

    let vehicle = block_on(engine.find_vehicle("Tesla-Model-3")).unwrap();
    assert_eq!(vehicle.name, "Tesla Model 3");

    let err = block_on(engine.find_vehicle("delorean")).unwrap_err();
    assert_eq!(err.code, 104);

    assert_eq!(block_on(engine.list_vehicles()).unwrap().len(), crate::entities::catalog().len());
}
