//! Record models
//!
//! Every persisted record comes in two shapes: the stored record (with the
//! primary key assigned by the store) and a `New*` insert payload that is
//! validated before it reaches storage.

pub mod amendment;
pub mod bill;
pub mod committee;
pub mod history;
pub mod info;
pub mod proceedings;
pub mod stage;

// Re-export commonly used types
pub use amendment::*;
pub use bill::*;
pub use committee::*;
pub use history::*;
pub use info::*;
pub use proceedings::*;
pub use stage::*;
