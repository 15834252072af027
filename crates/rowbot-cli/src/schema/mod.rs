pub(crate) mod elite;
