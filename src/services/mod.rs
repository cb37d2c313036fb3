pub mod auth_service;
pub mod delivery_service;
pub mod dish_service;
pub mod favorite_service;
pub mod order_service;
pub mod profile_service;
pub mod restaurant_service;

pub use auth_service::*;
pub use delivery_service::*;
pub use dish_service::*;
pub use favorite_service::*;
pub use order_service::*;
pub use profile_service::*;
pub use restaurant_service::*;
