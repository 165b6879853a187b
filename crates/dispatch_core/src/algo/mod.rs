pub(crate) mod clustering;
pub(crate) mod construction;
pub(crate) mod distribution;
pub(crate) mod optimizer;
pub(crate) mod two_opt;
