mod api;
mod certificates;

pub use api::{create_office, delete_office, get_office, list_offices, update_office};
pub use certificates::{check_eligibility, download_certificate};
