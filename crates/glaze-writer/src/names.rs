use indexmap::IndexMap;

/// Per-writer identifier sanitizer.
///
/// A source name that collides with the target's reserved words renders as
/// `{name}{suffix}_{n}`, with `n` assigned in first-collision order. The walk
/// order over a given program is fixed, so repeated runs produce
/// byte-identical output. Non-colliding names pass through untouched.
#[derive(Debug)]
pub struct Names {
    reserved: &'static [&'static str],
    suffix: &'static str,
    renamed: IndexMap<String, String>,
    next: u32,
}

impl Names {
    pub fn new(reserved: &'static [&'static str], suffix: &'static str) -> Self {
        Self {
            reserved,
            suffix,
            renamed: IndexMap::new(),
            next: 0,
        }
    }

    pub fn sanitize(&mut self, name: &str) -> String {
        if !self.reserved.contains(&name) {
            return name.to_owned();
        }

        if let Some(renamed) = self.renamed.get(name) {
            return renamed.clone();
        }

        let fresh = format!("{name}{}_{}", self.suffix, self.next);
        self.next += 1;
        log::debug!("renamed reserved identifier {name} to {fresh}");
        self.renamed.insert(name.to_owned(), fresh.clone());

        fresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESERVED: &[&str] = &["virtual", "float"];

    #[test]
    fn plain_names_pass_through() {
        let mut names = Names::new(RESERVED, "_x");

        assert_eq!(names.sanitize("color"), "color");
    }

    #[test]
    fn collisions_number_in_first_collision_order() {
        let mut names = Names::new(RESERVED, "_x");

        assert_eq!(names.sanitize("float"), "float_x_0");
        assert_eq!(names.sanitize("virtual"), "virtual_x_1");
        assert_eq!(names.sanitize("float"), "float_x_0");
    }
}
