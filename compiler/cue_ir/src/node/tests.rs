use super::*;
use crate::SharedInterner;
use pretty_assertions::assert_eq;

#[test]
fn tag_matches_kind() {
    let interner = SharedInterner::default();
    let x = interner.intern("x");

    let node = Node::new(NodeKind::Identifier(x));
    assert_eq!(node.tag(), NodeTag::Identifier);

    let call = Node::new(NodeKind::Call {
        callee: node.clone(),
        arguments: vec![],
    });
    assert_eq!(call.tag(), NodeTag::CallExpression);
}

#[test]
fn tag_names_match_surface_language() {
    assert_eq!(NodeTag::BinaryExpression.as_str(), "BinaryExpression");
    assert_eq!(NodeTag::GetProperty.as_str(), "GetProperty");
}

#[test]
fn spanned_nodes_carry_their_range() {
    let node = Node::spanned(NodeKind::Number(2.0), Span::new(0, 1));
    assert_eq!(node.span, Some(Span::new(0, 1)));
    assert_eq!(Node::new(NodeKind::Null).span, None);
}
