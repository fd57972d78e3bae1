mod availability;
mod calendar;
mod customer;
mod date_range;
mod money;
mod pricing;
mod reservation;
mod room;
mod status;

pub use self::availability::*;
pub use self::calendar::*;
pub use self::customer::*;
pub use self::date_range::*;
pub use self::money::*;
pub use self::pricing::*;
pub use self::reservation::*;
pub use self::room::*;
pub use self::status::*;
