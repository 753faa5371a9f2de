//! Общие DTO и контракты между backend и клиентами API

pub mod dashboards;
pub mod projections;
pub mod shared;
pub mod usecases;
