use super::*;
use pretty_assertions::assert_eq;

#[test]
fn session_allocates_sequential_ids() {
    let session = Session::new();
    let a = session.new_script("1", "a.js");
    let b = session.new_script("2", "b.js");
    assert_eq!(a.id.raw(), 0);
    assert_eq!(b.id.raw(), 1);
}

#[test]
fn sessions_do_not_share_counters() {
    let a = Session::new().new_script("x", "x.js");
    let b = Session::new().new_script("y", "y.js");
    assert_eq!(a.id, b.id);
}

#[test]
fn registry_round_trips() {
    let session = Session::new();
    let script = session.anonymous("var a = 1");
    let found = session.script(script.id).expect("registered");
    assert_eq!(&*found.source, "var a = 1");
    assert_eq!(&*found.url, "anonymous");
}
