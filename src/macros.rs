/// Builds a [`DataTree`](crate::DataTree) from a nested literal.
///
/// Each node is a parenthesised head, optionally followed by a braced block
/// of children. The head is the name and then the arguments, separated by
/// commas; a leading `add` or `remove` sets the flag. Names and arguments
/// may be any `ToString` value.
///
/// The result is a [`Result`](crate::Result), which is an error only when a
/// name is empty.
///
/// ```rust
/// use esdf::{esdf, Flag};
///
/// let tree = esdf! {
///     ("ship", "Much Confused Wardragon") {
///         ("mass", 35)
///         ("drag", 0.3)
///     }
///     (add "outfit", "Hyperdrive")
/// }
/// .unwrap();
///
/// let ship = tree.top_level().next().unwrap();
/// assert_eq!(ship.find_child("mass").unwrap().arg(0), Some("35"));
/// assert_eq!(tree.top_level().nth(1).unwrap().flag(), Flag::Add);
/// ```
#[macro_export]
macro_rules! esdf {
    // Node heads
    (@node add $name:expr $(, $arg:expr)*) => {
        $crate::esdf!(@node $name $(, $arg)*).with_flag($crate::Flag::Add)
    };

    (@node remove $name:expr $(, $arg:expr)*) => {
        $crate::esdf!(@node $name $(, $arg)*).with_flag($crate::Flag::Remove)
    };

    (@node $name:expr $(, $arg:expr)*) => {
        $crate::Node::new(::std::string::ToString::to_string(&$name))
            $(.with_arg(::std::string::ToString::to_string(&$arg)))*
    };

    // Sibling lists
    (@children $tree:ident, $parent:ident;) => {};

    (@children $tree:ident, $parent:ident; ($($head:tt)*) { $($body:tt)* } $($rest:tt)*) => {
        #[allow(unused_variables)]
        let child = $tree.add_child($parent, $crate::esdf!(@node $($head)*))?;
        $crate::esdf!(@children $tree, child; $($body)*);
        $crate::esdf!(@children $tree, $parent; $($rest)*);
    };

    (@children $tree:ident, $parent:ident; ($($head:tt)*) $($rest:tt)*) => {
        $tree.add_child($parent, $crate::esdf!(@node $($head)*))?;
        $crate::esdf!(@children $tree, $parent; $($rest)*);
    };

    // Entry point
    ($($nodes:tt)*) => {
        (|| -> $crate::Result<$crate::DataTree> {
            #[allow(unused_mut)]
            let mut tree = $crate::DataTree::new();
            #[allow(unused_variables)]
            let root = tree.root();
            $crate::esdf!(@children tree, root; $($nodes)*);
            Ok(tree)
        })()
    };
}
