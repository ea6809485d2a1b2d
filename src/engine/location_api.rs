use super::Engine;

use async_trait::async_trait;

use crate::{
    api::LocationAPI,
    entities::{Location, LocationSource},
    error::Error,
};

#[async_trait]
impl LocationAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn resolve_location(&self, source: LocationSource) -> Result<Location, Error> {
        let location = match source {
            LocationSource::Address(address) => self.geocoder.geocode(&address).await?,
            LocationSource::Coordinates(coordinates) => {
                let coordinates = coordinates.validate()?;

                // a click still routes fine without a street name
                let description = match self.geocoder.reverse_geocode(coordinates).await {
                    Ok(description) => description,
                    Err(err) => {
                        tracing::warn!(%err, "reverse geocoding failed");
                        coordinates.into()
                    }
                };

                Location::new(coordinates, description)
            }
        };

        Ok(location)
    }
}

#[test]
fn resolve_address_test() {
    use crate::entities::Coordinates;
    use tokio_test::block_on;

    let engine = super::fakes::engine();

    let location = block_on(engine.resolve_location(LocationSource::Address("Berlin".into())))
        .unwrap();
    assert_eq!(location.description, "Berlin, Deutschland");
    assert_eq!(location.coordinates, Coordinates::new(52.52, 13.405));

    let err = block_on(engine.resolve_location(LocationSource::Address("Atlantis".into())))
        .unwrap_err();
    assert_eq!(err.code, 102);
}

#[test]
fn resolve_coordinates_test() {
    use crate::entities::Coordinates;
    use tokio_test::block_on;

    let engine = super::fakes::engine();

    let clicked = Coordinates::new(48.1351, 11.582);
    let location = block_on(engine.resolve_location(LocationSource::Coordinates(clicked))).unwrap();
    assert_eq!(location.description, "near 48.1351, 11.582");

    // the fake cannot reverse geocode the southern hemisphere
    let clicked = Coordinates::new(-33.87, 151.21);
    let location = block_on(engine.resolve_location(LocationSource::Coordinates(clicked))).unwrap();
    assert_eq!(location.description, "-33.870000, 151.210000");

    let invalid = Coordinates::new(91.0, 0.0);
    let err = block_on(engine.resolve_location(LocationSource::Coordinates(invalid))).unwrap_err();
    assert_eq!(err.code, 105);
}
