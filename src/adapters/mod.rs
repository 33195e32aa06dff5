// Adapters layer: concrete implementations of the domain ports for external systems.

pub mod amadeus;
pub mod chat_completion;
pub mod http;
pub mod local_storage;
pub mod nominatim;
pub mod openweather;

pub use amadeus::AmadeusClient;
pub use chat_completion::ChatCompletionClient;
pub use local_storage::LocalStorage;
pub use nominatim::NominatimGeocoder;
pub use openweather::OpenWeatherClient;
