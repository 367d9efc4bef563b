use pdf_writer::Ref;
use std::collections::HashMap;

/// Every kind of indirect object a report document is made of
#[derive(Eq, PartialEq, Hash, Copy, Clone, Debug)]
pub(super) enum RefType {
    Catalog,
    Info,
    PageTree,
    Page(usize),
    ContentForPage(usize),
    Font(usize),
    CidFont(usize),
    ToUnicode(usize),
    FontDescriptor(usize),
    FontData(usize),
    Builtin(usize),
    Image(usize),
    ImageMask(usize),
}

/// Hands out object numbers and remembers which object got which
pub(super) struct ObjectReferences {
    refs: HashMap<RefType, Ref>,
    next_id: i32,
}

impl ObjectReferences {
    pub fn new() -> ObjectReferences {
        ObjectReferences {
            refs: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn get(&self, ref_type: RefType) -> Option<Ref> {
        self.refs.get(&ref_type).copied()
    }

    /// The reference of `ref_type`, allocated on first use
    pub fn get_or_gen(&mut self, ref_type: RefType) -> Ref {
        if let Some(id) = self.get(ref_type) {
            return id;
        }
        self.gen(ref_type)
    }

    pub fn gen(&mut self, ref_type: RefType) -> Ref {
        let id = Ref::new(self.next_id);
        self.next_id += 1;
        self.refs.insert(ref_type, id);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn references_are_stable() {
        let mut refs = ObjectReferences::new();
        let catalog = refs.gen(RefType::Catalog);
        let font = refs.get_or_gen(RefType::Font(0));
        assert_ne!(catalog, font);
        assert_eq!(refs.get_or_gen(RefType::Font(0)), font);
        assert_eq!(refs.get(RefType::Image(0)), None);
    }
}
