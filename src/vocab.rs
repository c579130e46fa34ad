//! RDF, RDFS and OWL vocabulary plus the string helpers every pass shares.

/// `rdf:type`
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

/// `rdfs:label`
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
/// `rdfs:comment`
pub const RDFS_COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
/// `rdfs:domain`
pub const RDFS_DOMAIN: &str = "http://www.w3.org/2000/01/rdf-schema#domain";
/// `rdfs:range`
pub const RDFS_RANGE: &str = "http://www.w3.org/2000/01/rdf-schema#range";

// OWL types
pub const OWL_CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
pub const OWL_OBJECT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#ObjectProperty";
pub const OWL_DATATYPE_PROPERTY: &str = "http://www.w3.org/2002/07/owl#DatatypeProperty";
pub const OWL_FUNCTIONAL_PROPERTY: &str = "http://www.w3.org/2002/07/owl#FunctionalProperty";

/// `owl:equivalentClass`
pub const OWL_EQUIVALENT_CLASS: &str = "http://www.w3.org/2002/07/owl#equivalentClass";

/// Trailing path or fragment segment of a URI.
///
/// Splits on the last `/` first, then on the last `#`, so both
/// `http://ex.org/onto#Car` and `http://ex.org/onto/Car` yield `Car`.
pub fn local_name(uri: &str) -> &str {
    let after_slash = uri.rsplit('/').next().unwrap_or(uri);
    after_slash.rsplit('#').next().unwrap_or(after_slash)
}

/// Everything in front of [`local_name`].
pub fn namespace(uri: &str) -> &str {
    &uri[..uri.len() - local_name(uri).len()]
}

/// Case- and surrounding-whitespace-insensitive form of a label.
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}
