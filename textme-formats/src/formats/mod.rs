/*!
 This module contains the decoders and encoders for each supported backup
 format
*/

pub mod android;
pub mod win10;

use roxmltree::Node;

/// Find the first child element with the given tag name
pub(crate) fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|child| child.has_tag_name(tag))
}

/// Iterate over every child element with the given tag name, in document
/// order
pub(crate) fn children<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children().filter(move |child| child.has_tag_name(tag))
}
