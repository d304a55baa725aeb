//! Backend routes, relative to the API base URL

pub const LOGIN: &str = "/login";
pub const CURRENT_USER: &str = "/getUserById";
pub const INSURANCE_APPLICATIONS: &str = "/getAllInsuranceApplications";
pub const INSURANCE_PLANS: &str = "/getMyInsurancePlans";
pub const COMMISSION_RULES: &str = "/getCommissionRules";
pub const CREATE_COMMISSION_RULES: &str = "/createCommissionRules";
pub const UPDATE_COMMISSION_RULES: &str = "/updateCommissionRules";

pub fn delete_insurance_plan(plan_id: &str) -> String {
    format!("/deleteInsurancePlan/{plan_id}")
}
