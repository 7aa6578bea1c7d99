pub mod evento;
