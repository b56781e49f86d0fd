pub(crate) mod forecast;
pub(crate) mod health;
pub(crate) mod recommendations;
pub(crate) mod risk_profile;
pub(crate) mod stocks;
