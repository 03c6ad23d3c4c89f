//! Conversion graph built from the keys of the rate table.
//!
//! Every recorded pair `a/b` is an edge usable in both directions, and every
//! hop costs 1 regardless of the rate's magnitude. The shortest path is
//! therefore the one with the fewest conversions.

use std::collections::{HashMap, VecDeque};

use ratemesh_common::{Currency, CurrencyPair};

#[derive(Debug, Default)]
struct Adjacency<'a> {
    /// Pairs where the vertex is the base.
    outgoing: Vec<&'a Currency>,
    /// Pairs where the vertex is the quote.
    incoming: Vec<&'a Currency>,
}

/// Undirected view over a point-in-time list of recorded pairs.
#[derive(Debug)]
pub struct RateGraph<'a> {
    vertices: Vec<&'a Currency>,
    adjacency: HashMap<&'a Currency, Adjacency<'a>>,
}

impl<'a> RateGraph<'a> {
    /// Build the graph. Vertices are the union of all endpoints, kept in
    /// first-seen order.
    pub fn new(pairs: &'a [CurrencyPair]) -> Self {
        let mut vertices = Vec::new();
        let mut adjacency: HashMap<&'a Currency, Adjacency<'a>> = HashMap::new();

        for pair in pairs {
            for vertex in [&pair.base, &pair.quote] {
                if !adjacency.contains_key(vertex) {
                    adjacency.insert(vertex, Adjacency::default());
                    vertices.push(vertex);
                }
            }

            if let Some(adj) = adjacency.get_mut(&pair.base) {
                adj.outgoing.push(&pair.quote);
            }
            if let Some(adj) = adjacency.get_mut(&pair.quote) {
                adj.incoming.push(&pair.base);
            }
        }

        Self {
            vertices,
            adjacency,
        }
    }

    /// Currencies present in the graph, in first-seen order.
    pub fn vertices(&self) -> &[&'a Currency] {
        &self.vertices
    }

    /// Whether the currency appears in any recorded pair.
    pub fn contains(&self, currency: &Currency) -> bool {
        self.adjacency.contains_key(currency)
    }

    /// Neighbours of a vertex: quotes of pairs it is the base of, then bases
    /// of pairs it is the quote of.
    fn neighbours(&self, vertex: &Currency) -> impl Iterator<Item = &'a Currency> + '_ {
        self.adjacency
            .get(vertex)
            .into_iter()
            .flat_map(|adj| adj.outgoing.iter().chain(adj.incoming.iter()).copied())
    }

    /// Fewest-hop path from `from` to `to`, both endpoints included.
    ///
    /// Vertices are settled in order of tentative distance; with unit edge
    /// costs a FIFO frontier gives exactly that order, ties falling to
    /// discovery order. The search stops as soon as `to` is settled.
    ///
    /// When `from == to` and the currency is known the result is the trivial
    /// single-vertex path. Returns `None` if either currency is unknown or
    /// the two are disconnected.
    pub fn shortest_path(&self, from: &Currency, to: &Currency) -> Option<Vec<Currency>> {
        let start = *self.adjacency.get_key_value(from)?.0;
        if !self.contains(to) {
            return None;
        }

        let mut distances: HashMap<&'a Currency, usize> = HashMap::new();
        let mut previous: HashMap<&'a Currency, &'a Currency> = HashMap::new();
        let mut frontier = VecDeque::new();

        distances.insert(start, 0);
        frontier.push_back(start);

        while let Some(current) = frontier.pop_front() {
            if current == to {
                return Some(Self::walk_back(&previous, current));
            }

            let alt = distances[current] + 1;
            for neighbour in self.neighbours(current) {
                if !distances.contains_key(neighbour) {
                    distances.insert(neighbour, alt);
                    previous.insert(neighbour, current);
                    frontier.push_back(neighbour);
                }
            }
        }

        None
    }

    fn walk_back(previous: &HashMap<&'a Currency, &'a Currency>, end: &'a Currency) -> Vec<Currency> {
        let mut path = vec![end.clone()];
        let mut current = end;

        while let Some(&prev) = previous.get(current) {
            path.push(prev.clone());
            current = prev;
        }

        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<CurrencyPair> {
        raw.iter().map(|(b, q)| CurrencyPair::new(*b, *q)).collect()
    }

    fn codes(path: &[Currency]) -> Vec<&str> {
        path.iter().map(|c| c.code()).collect()
    }

    #[test]
    fn test_vertices_are_union_of_endpoints() {
        let edges = pairs(&[("USD", "CAD"), ("CAD", "GBP"), ("USD", "EUR")]);
        let graph = RateGraph::new(&edges);

        let vertices: Vec<&str> = graph.vertices().iter().map(|c| c.code()).collect();
        assert_eq!(vertices, vec!["USD", "CAD", "GBP", "EUR"]);
        assert!(!graph.contains(&Currency::jpy()));
    }

    #[test]
    fn test_direct_path() {
        let edges = pairs(&[("USD", "EUR")]);
        let graph = RateGraph::new(&edges);

        let path = graph.shortest_path(&Currency::usd(), &Currency::eur()).unwrap();
        assert_eq!(codes(&path), vec!["USD", "EUR"]);
    }

    #[test]
    fn test_reverse_edges_are_traversable() {
        let edges = pairs(&[("USD", "CAD"), ("CAD", "GBP"), ("USD", "EUR")]);
        let graph = RateGraph::new(&edges);

        let path = graph.shortest_path(&Currency::eur(), &Currency::gbp()).unwrap();
        assert_eq!(codes(&path), vec!["EUR", "USD", "CAD", "GBP"]);
    }

    #[test]
    fn test_fewest_hops_wins_over_longer_chain() {
        let edges = pairs(&[("A", "B"), ("B", "C"), ("C", "D"), ("A", "D")]);
        let graph = RateGraph::new(&edges);

        let path = graph
            .shortest_path(&Currency::new("A"), &Currency::new("D"))
            .unwrap();
        assert_eq!(codes(&path), vec!["A", "D"]);
    }

    #[test]
    fn test_unknown_or_disconnected() {
        let edges = pairs(&[("USD", "CAD"), ("EUR", "CHF")]);
        let graph = RateGraph::new(&edges);

        assert!(graph.shortest_path(&Currency::jpy(), &Currency::cad()).is_none());
        assert!(graph.shortest_path(&Currency::cad(), &Currency::jpy()).is_none());
        assert!(graph.shortest_path(&Currency::usd(), &Currency::eur()).is_none());
    }

    #[test]
    fn test_self_path_is_trivial() {
        let edges = pairs(&[("USD", "CAD"), ("USD", "USD")]);
        let graph = RateGraph::new(&edges);

        let path = graph.shortest_path(&Currency::usd(), &Currency::usd()).unwrap();
        assert_eq!(codes(&path), vec!["USD"]);
    }

    #[test]
    fn test_empty_graph() {
        let graph = RateGraph::new(&[]);
        assert!(graph.vertices().is_empty());
        assert!(graph.shortest_path(&Currency::usd(), &Currency::usd()).is_none());
    }
}
