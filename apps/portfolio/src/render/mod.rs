//! Output renderers. Both read the canonical document fresh and filter it
//! through the visibility policy for their own channel.

pub mod dates;
pub mod pdf;
pub mod site;

pub use pdf::render_pdf;
pub use site::render_site;
