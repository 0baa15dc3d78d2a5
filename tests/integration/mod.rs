//! Integration tests driving the folio binary against temporary git repositories

mod helpers;
#[path = "../support/mock_ledger.rs"]
mod mock_ledger;
mod test_doctor;
mod test_release;
mod test_version;
