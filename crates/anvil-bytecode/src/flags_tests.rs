use crate::flags::MethodFlags;

#[test]
fn union_and_contains() {
    let flags = MethodFlags::PUBLIC | MethodFlags::STATIC;
    assert!(flags.contains(MethodFlags::PUBLIC));
    assert!(flags.contains(MethodFlags::STATIC));
    assert!(!flags.contains(MethodFlags::FINAL));
    assert!(flags.contains(MethodFlags::empty()));
}

#[test]
fn or_assign() {
    let mut flags = MethodFlags::PUBLIC;
    flags |= MethodFlags::ABSTRACT;
    assert_eq!(flags, MethodFlags::PUBLIC | MethodFlags::ABSTRACT);
}

#[test]
fn display_is_ordered() {
    let flags = MethodFlags::ABSTRACT | MethodFlags::PUBLIC;
    assert_eq!(flags.to_string(), "[public abstract]");
    assert_eq!(MethodFlags::empty().to_string(), "[]");
    assert_eq!(
        (MethodFlags::PUBLIC | MethodFlags::STATIC | MethodFlags::VARARGS).to_string(),
        "[public static varargs]"
    );
}
