pub mod arrival;
pub mod flow;
pub mod monitor;
pub mod operation_done;
pub mod prep_done;
pub mod recovery_done;
