pub mod ds;
pub mod proto;
