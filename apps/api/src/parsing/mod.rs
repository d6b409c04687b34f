// Résumé parsing stages. Each stage takes raw text (and earlier results) and
// returns a fresh value; nothing here fails on sparse or oddly formatted input.

pub mod entities;
pub mod fuzzy;
pub mod sections;
pub mod skills;
