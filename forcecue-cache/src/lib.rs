//! Process-wide text interner. The renderer keys its rasterized text cache by
//! intern id so that repeated HUD strings are only laid out once.

use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::RwLock;
pub use string_cache::DefaultAtom as Atom;

#[derive(Default)]
struct Interner {
    atoms: Vec<Atom>,
    ids: HashMap<Atom, usize>,
}

lazy_static! {
    static ref TEXT_INTERNER: RwLock<Interner> = RwLock::new(Interner::default());
}

/// Intern a string and return its id. Ids are stable for the process lifetime.
pub fn intern_text(s: &str) -> usize {
    let atom = Atom::from(s);
    if let Ok(table) = TEXT_INTERNER.read() {
        if let Some(&id) = table.ids.get(&atom) {
            return id;
        }
    }
    let mut table = TEXT_INTERNER
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(&id) = table.ids.get(&atom) {
        return id;
    }
    let id = table.atoms.len();
    table.atoms.push(atom.clone());
    table.ids.insert(atom, id);
    id
}

pub fn text_count() -> usize {
    TEXT_INTERNER.read().map(|t| t.atoms.len()).unwrap_or(0)
}

pub fn get_text(id: usize) -> Option<Atom> {
    TEXT_INTERNER
        .read()
        .ok()
        .and_then(|t| t.atoms.get(id).cloned())
}
