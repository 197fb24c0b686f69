// Roster: the allowed J-5 labor categories and the candidates mapped onto them.

pub mod handlers;
pub mod ingest;
pub mod prompts;
