pub mod loader;
pub mod report;
pub mod text;
pub mod workbook;

pub use loader::{LoadError, load_problem, parse_problem, read_problem};
pub use report::Report;
pub use text::{TextReport, render_tableau};
pub use workbook::WorkbookReport;
