use crate::certification::{EligibilityPolicy, TierTable};
use crate::config::Config;
use crate::db::DbPool;
use crate::pdf::CertificateTemplate;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<Config>,
    pub tiers: TierTable,
    pub eligibility: EligibilityPolicy,
    pub certificate: CertificateTemplate,
}
