use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// results[]
//  ├── Model / Year / VIN / TrimName / VrlName
//  ├── RegistrationDetails
//  │    └── LicensePlateNumber
//  ├── Odometer / OdometerType
//  ├── OptionCodeSpecs
//  │    └── C_OPTS
//  │         └── options[]
//  │              └── name
//  ├── InventoryPrice
//  └── VehiclePhotos[]
//       └── imageUrl
//
// Everything is optional here; `Listing::from_vehicle` decides what is required.
// A field of the wrong type reads as absent instead of failing the response.

fn lenient<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(de)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_list<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(lenient(de)?.unwrap_or_default())
}

#[derive(Debug, Clone, Deserialize)]
pub struct Vehicle {
    #[serde(rename = "Model", default, deserialize_with = "lenient")]
    pub model: Option<String>,
    #[serde(rename = "Year", default, deserialize_with = "lenient")]
    pub year: Option<i32>,
    #[serde(rename = "VIN", default, deserialize_with = "lenient")]
    pub vin: Option<String>,
    #[serde(rename = "RegistrationDetails", default, deserialize_with = "lenient")]
    pub registration_details: Option<Registration>,
    #[serde(rename = "Odometer", default, deserialize_with = "lenient")]
    pub odometer: Option<f64>,
    #[serde(rename = "OdometerType", default, deserialize_with = "lenient")]
    pub odometer_type: Option<String>,
    #[serde(rename = "TrimName", default, deserialize_with = "lenient")]
    pub trim_name: Option<String>,
    #[serde(rename = "OptionCodeSpecs", default, deserialize_with = "lenient")]
    pub option_code_specs: Option<OptionCodeSpecs>,
    #[serde(rename = "VrlName", default, deserialize_with = "lenient")]
    pub vrl_name: Option<String>,
    #[serde(rename = "InventoryPrice", default, deserialize_with = "lenient")]
    pub inventory_price: Option<f64>,
    #[serde(rename = "VehiclePhotos", default, deserialize_with = "lenient_list")]
    pub vehicle_photos: Vec<Photo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    #[serde(rename = "LicensePlateNumber", default, deserialize_with = "lenient")]
    pub license_plate_number: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptionCodeSpecs {
    #[serde(rename = "C_OPTS", default, deserialize_with = "lenient")]
    pub c_opts: Option<OptionSpecs>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptionSpecs {
    #[serde(default, deserialize_with = "lenient_list")]
    pub options: Vec<OptionSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptionSpec {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Photo {
    #[serde(rename = "imageUrl", default, deserialize_with = "lenient")]
    pub image_url: Option<String>,
}

/// The `query` parameter sent to the inventory endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryQuery {
    pub model: String,
    pub condition: String,
    pub options: QueryOptions,
    pub arrangeby: String,
    pub order: String,
    pub market: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryOptions {
    #[serde(rename = "Year")]
    pub year: Vec<i32>,
    #[serde(rename = "TRIM")]
    pub trim: Vec<String>,
}

#[derive(Serialize)]
struct QueryEnvelope<'a> {
    query: &'a InventoryQuery,
}

impl InventoryQuery {
    pub fn new(model: &str, condition: &str, market: &str, years: Vec<i32>, trims: Vec<String>) -> Self {
        Self {
            model: model.to_string(),
            condition: condition.to_string(),
            options: QueryOptions { year: years, trim: trims },
            arrangeby: "Year".to_string(),
            order: "desc".to_string(),
            market: market.to_string(),
        }
    }

    /// JSON text for the `query` URL parameter.
    pub fn to_param(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&QueryEnvelope { query: self })
    }
}
