// Text measurement and greedy line wrapping for the PDF resume.
// Pure and synchronous; the PDF renderer calls it before touching any drawing API.

pub mod font_metrics;
pub mod wrap;

pub use font_metrics::{get_metrics, Font};
pub use wrap::wrap_lines;
