/// Slug derivation for catalog entities: lowercase the title, keep
/// alphanumerics (unicode-aware, the catalog is not ASCII-only), collapse
/// everything else into single hyphens.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_hyphen = false;
    for ch in input.chars() {
        if ch.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            for lower in ch.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

/// Subcategory slugs are namespaced by their category so they stay unique
/// across the whole tree ("dairy milk" -> "dairy-milk").
pub fn subcategory_slug(category_title: &str, title: &str) -> String {
    slugify(&format!("{category_title} {title}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_titles() {
        assert_eq!(slugify("Dairy Products"), "dairy-products");
        assert_eq!(slugify("  Fresh   Bread  "), "fresh-bread");
    }

    #[test]
    fn punctuation_collapses() {
        assert_eq!(slugify("Tea & Coffee, 2nd floor"), "tea-coffee-2nd-floor");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn unicode_titles_survive() {
        assert_eq!(slugify("Молоко 3.2%"), "молоко-3-2");
    }

    #[test]
    fn subcategory_slug_includes_category() {
        assert_eq!(subcategory_slug("Dairy", "Milk"), "dairy-milk");
    }
}
