use joshinkan::multipart::{self, FormValue};
use joshinkan::FormatError;

const ADULT_BODY: &str = include_str!("data/adult_registration.txt");
const CHILDREN_BODY: &str = include_str!("data/children_registration.txt");
const NO_DISPOSITION_BODY: &str = include_str!("data/no_content_disposition_header.txt");

const ADULT_CONTENT_TYPE: &str = "multipart/form-data; boundary=----WebKitFormBoundaryiB5iskbmcAfH1zPo";
const CHILDREN_CONTENT_TYPE: &str = "multipart/form-data; boundary=----WebKitFormBoundaryJBxGtknRPIBvH5oj";

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

#[test]
fn test_flat_form_data() {
    let form = multipart::parse(ADULT_BODY, ADULT_CONTENT_TYPE).unwrap();
    assert_eq!(form.text("first_name"), Some("sven"));
    assert_eq!(form.text("last_name"), Some("mkw"));
    assert_eq!(form.text("email"), Some("sven.mkw@gmail.com"));
    assert_eq!(form.text("phone"), Some("123456789"));
    assert_eq!(form.text("age"), Some("23"));
    assert_eq!(form.text("privacy"), Some("on"));
    assert_eq!(form.len(), 6);
}

#[test]
fn test_list_form_data() {
    let form = multipart::parse(CHILDREN_BODY, CHILDREN_CONTENT_TYPE).unwrap();
    assert_eq!(form.text("first_name"), Some("Dad"));
    assert_eq!(form.text("last_name"), Some("Fam"));
    assert_eq!(form.text("email"), Some("fam@mail.com"));
    assert_eq!(form.text("phone"), Some("049127495"));
    assert_eq!(form.text("age"), Some(""));
    assert_eq!(form.text("parents_consent"), Some("on"));
    assert_eq!(form.text("privacy"), Some("on"));
    assert_eq!(form.list("child_first_name"), Some(&strings(&["Boi", "Girl"])[..]));
    assert_eq!(form.list("child_last_name"), Some(&strings(&["Fam", "Fam"])[..]));
    assert_eq!(form.list("child_age"), Some(&strings(&["17", "16"])[..]));
}

#[test]
fn test_field_order_is_first_appearance() {
    let form = multipart::parse(CHILDREN_BODY, CHILDREN_CONTENT_TYPE).unwrap();
    let names: Vec<&str> = form.iter().map(|(name, _)| name).collect();
    assert_eq!(
        names,
        [
            "first_name",
            "last_name",
            "email",
            "phone",
            "age",
            "child_first_name",
            "child_last_name",
            "child_age",
            "parents_consent",
            "privacy"
        ]
    );
}

#[test]
fn test_list_suffix_never_leaks_into_names() {
    let form = multipart::parse(CHILDREN_BODY, CHILDREN_CONTENT_TYPE).unwrap();
    assert!(form.iter().all(|(name, _)| !name.ends_with("[]")));
    assert!(matches!(form.get("child_age"), Some(FormValue::List(items)) if items.len() == 2));
}

#[test]
fn test_invalid_boundary_parameter() {
    let content_type = "multipart/form-data; boundary-xxx=----WebKitFormBoundaryJBxGtknRPIBvH5oj";
    let err = multipart::parse(ADULT_BODY, content_type).unwrap_err();
    assert!(matches!(err, FormatError::BoundaryNotFound { .. }));
    assert!(err.to_string().contains("could not parse"));
}

#[test]
fn test_empty_boundary() {
    let err = multipart::parse(ADULT_BODY, "multipart/form-data; boundary=").unwrap_err();
    assert!(matches!(err, FormatError::BoundaryNotFound { .. }));

    let err = multipart::parse("", "multipart/form-data; boundary=").unwrap_err();
    assert!(matches!(err, FormatError::BoundaryNotFound { .. }));
}

#[test]
fn test_mismatching_boundary() {
    let err = multipart::parse(ADULT_BODY, CHILDREN_CONTENT_TYPE).unwrap_err();
    assert!(matches!(err, FormatError::InsufficientParts { .. }));
    assert!(err.to_string().contains("boundary not found"));
}

#[test]
fn test_missing_end_boundary() {
    let body = CHILDREN_BODY.trim_end().strip_suffix("--").unwrap();
    let err = multipart::parse(body, CHILDREN_CONTENT_TYPE).unwrap_err();
    assert_eq!(err, FormatError::InvalidEndBoundary);
    assert!(err.to_string().contains("invalid end boundary"));
}

#[test]
fn test_missing_content_disposition_header() {
    let err = multipart::parse(NO_DISPOSITION_BODY, CHILDREN_CONTENT_TYPE).unwrap_err();
    assert_eq!(err, FormatError::MissingContentDisposition { part: 1 });
    assert!(err.to_string().contains("content disposition"));
}

#[test]
fn test_errors_are_client_errors() {
    for err in [
        multipart::parse(ADULT_BODY, "text/plain").unwrap_err(),
        multipart::parse(ADULT_BODY, CHILDREN_CONTENT_TYPE).unwrap_err(),
        multipart::parse(NO_DISPOSITION_BODY, CHILDREN_CONTENT_TYPE).unwrap_err(),
    ] {
        assert!(!err.is_internal(), "{} should not be internal", err);
    }
}
