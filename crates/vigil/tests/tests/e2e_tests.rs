#[path = "e2e/approval_flow.rs"]
mod approval_flow;

#[path = "e2e/sla_sweep.rs"]
mod sla_sweep;
