use crate::{
    entity::{Building, EntityId, Microwave, NewMicrowave, NewReport, Report},
    prelude::*,
};

/// The backend the map talks to. Admin operations are expected to fail if the implementation has
/// no admin credentials.
pub trait MicrowaveApi {
    /// Get every building on campus
    fn buildings(&self) -> impl Future<Output = Result<Vec<Building>>>;
    /// Get every approved microwave
    fn microwaves(&self) -> impl Future<Output = Result<Vec<Microwave>>>;
    /// Get every broken-microwave report
    fn reports(&self) -> impl Future<Output = Result<Vec<Report>>>;
    /// Submit a new microwave, it won't show up until an admin approves it
    fn create_microwave(&self, microwave: &NewMicrowave) -> impl Future<Output = Result>;
    /// Report a microwave as not working
    fn create_report(&self, report: &NewReport) -> impl Future<Output = Result>;
    /// Flag a microwave as broken
    fn mark_broken(&self, id: EntityId) -> impl Future<Output = Result>;
    /// (Admin) Get submissions waiting for approval
    fn pending_microwaves(&self) -> impl Future<Output = Result<Vec<Microwave>>>;
    /// (Admin) Approve a pending submission
    fn approve_microwave(&self, id: EntityId) -> impl Future<Output = Result>;
    /// (Admin) Reject and delete a pending submission
    fn reject_microwave(&self, id: EntityId) -> impl Future<Output = Result>;
}
