//! `META-INF/MANIFEST.MF` main-section parsing.

use indexmap::IndexMap;

pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

/// Version attributes in order of preference.
pub const VERSION_ATTRIBUTES: [&str; 3] = [
    "Implementation-Version",
    "Bundle-Version",
    "Specification-Version",
];

/// Parses the main section of a manifest, preserving attribute order.
///
/// Lines starting with a single space continue the previous value. The main
/// section ends at the first blank line.
pub fn parse_main_attributes(content: &str) -> IndexMap<String, String> {
    let mut attributes: IndexMap<String, String> = IndexMap::new();
    let mut last_key: Option<String> = None;

    for raw in content.lines() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.is_empty() {
            break;
        }

        if let Some(continuation) = line.strip_prefix(' ') {
            if let Some(value) = last_key.as_ref().and_then(|k| attributes.get_mut(k)) {
                value.push_str(continuation);
            }
            continue;
        }

        match line.split_once(':') {
            Some((key, value)) => {
                let key = key.trim().to_string();
                attributes.insert(key.clone(), value.trim_start().to_string());
                last_key = Some(key);
            }
            None => last_key = None,
        }
    }

    attributes
}

pub fn version_of(attributes: &IndexMap<String, String>) -> Option<&str> {
    VERSION_ATTRIBUTES
        .iter()
        .find_map(|key| attributes.get(*key))
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_section_only() {
        let manifest = "Manifest-Version: 1.0\r\n\
                        Implementation-Title: demo\r\n\
                        \r\n\
                        Name: org/demo/\r\n\
                        Implementation-Version: 9.9\r\n";
        let attrs = parse_main_attributes(manifest);

        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get_index(0).unwrap().0, "Manifest-Version");
        assert_eq!(attrs["Implementation-Title"], "demo");
        assert_eq!(version_of(&attrs), None);
    }

    #[test]
    fn test_continuation_lines() {
        let manifest = "Bundle-Description: a very long descr\n iption here\nBundle-Version: 2.1.0\n";
        let attrs = parse_main_attributes(manifest);

        assert_eq!(attrs["Bundle-Description"], "a very long description here");
        assert_eq!(version_of(&attrs), Some("2.1.0"));
    }

    #[test]
    fn test_version_preference() {
        let attrs = parse_main_attributes(
            "Specification-Version: 1\nBundle-Version: 2\nImplementation-Version: 3\n",
        );
        assert_eq!(version_of(&attrs), Some("3"));
    }
}
