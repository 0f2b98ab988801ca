pub mod questoes;
pub mod usuarios;
