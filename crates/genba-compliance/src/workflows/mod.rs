pub mod genba;
