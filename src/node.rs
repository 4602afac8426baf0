use crate::{Node, Token, TokenImpl};
use ptree::TreeItem;
use std::fmt::{Debug, Display, Formatter};

impl<TL: Debug> Display for Node<TL> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let children_string: Vec<String> = self.nodes.iter().map(|c| format!("{}", c)).collect();
        f.debug_struct("")
            .field("value", &(&self.node_type, &self.token))
            .field("children", &children_string)
            .finish()
    }
}

impl<TL: TokenImpl> Node<TL> {
    /// The sentinel meaning "no node".
    pub fn zero() -> Self {
        Node {
            node_type: "",
            token: Token::none(),
            nodes: Vec::with_capacity(0),
            leaf: false,
        }
    }

    /// A leaf covering exactly one token, as produced by a primitive parser.
    pub fn leaf(node_type: &'static str, token: Token<TL>) -> Self {
        Node {
            node_type,
            token,
            nodes: Vec::with_capacity(0),
            leaf: true,
        }
    }

    /// An empty labelled node awaiting children. Its leading token is assigned
    /// when the first child is appended.
    pub(crate) fn branch(node_type: &'static str) -> Self {
        Node {
            node_type,
            token: Token::none(),
            nodes: Vec::new(),
            leaf: false,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.node_type.is_empty()
    }

    /// The tokens this node covers: the concatenation of its children's tokens,
    /// or the single leading token for primitive leaves. Zero nodes and empty
    /// collections cover nothing; an empty collection's leading token is only
    /// an anchor.
    pub fn tokens(&self) -> Vec<Token<TL>> {
        if self.is_zero() {
            return Vec::new();
        }

        if self.leaf {
            if self.token.token == TL::no_token() {
                return Vec::new();
            }
            return vec![self.token];
        }

        let mut tokens = Vec::new();
        for n in &self.nodes {
            tokens.extend(n.tokens());
        }
        tokens
    }

    /// The number of tokens this node covers.
    pub fn length(&self) -> usize {
        self.tokens().len()
    }
}

impl<TL: TokenImpl> Node<TL> {
    /// Find a node of the given type searching through all nested children.
    pub fn find_node(&self, node_type: &str) -> Option<&Node<TL>> {
        if self.node_type == node_type {
            Some(self)
        } else {
            self.nodes.iter().find_map(|child| child.find_node(node_type))
        }
    }

    /// Return all the nodes of the given type, in tree order.
    pub fn list_nodes<'this>(&'this self, node_type: &str) -> Vec<&'this Node<TL>> {
        let mut list: Vec<&'this Node<TL>> = Vec::new();
        self.walk_tree(&mut list, &|tree, list| {
            if tree.node_type == node_type {
                list.push(tree);
            }
        });
        list
    }

    pub fn get_child(&self, node_type: &str) -> Option<&Node<TL>> {
        self.nodes.iter().find(|child| child.node_type == node_type)
    }

    pub fn contains(&self, node_type: &str) -> bool {
        self.node_type == node_type || self.nodes.iter().any(|child| child.contains(node_type))
    }

    fn walk_tree<'this, TR, TF: Fn(&'this Self, &mut TR)>(&'this self, r: &mut TR, p: &TF) {
        p(self, r);
        self.nodes.iter().for_each(|child| child.walk_tree(r, p));
    }
}

impl<TL: TokenImpl> TreeItem for Node<TL> {
    type Child = Self;

    fn write_self<W: std::io::Write>(&self, f: &mut W, _: &ptree::Style) -> std::io::Result<()> {
        write!(
            f,
            "{} # {}-{}",
            self.node_type, self.token.start, self.token.end
        )
    }

    fn children(&self) -> std::borrow::Cow<[Self::Child]> {
        std::borrow::Cow::from(&self.nodes)
    }
}

impl<TL: TokenImpl> Node<TL> {
    pub fn print(&self) -> Result<(), std::io::Error> {
        ptree::print_tree(self)
    }
}
