// Service exports
pub mod firestore;
pub mod geocoder;
pub mod memory;
pub mod sample;
pub mod sheets;
pub mod store;

pub use firestore::FirestoreStore;
pub use geocoder::{build_geocoder, FixedGeocoder, GeocodeError, Geocoder, LocationCache, NominatimGeocoder};
pub use memory::MemoryStore;
pub use sample::SampleStore;
pub use sheets::SheetsStore;
pub use store::{build_store, Collection, RecordStore, StoreError};
