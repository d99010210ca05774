use super::{MappingSearch, SearchOutcome, Strategy};
use crate::alphabet::Alphabet;
use crate::cipher::{match_across_alphabets, Mapping};
use crate::corpus::Corpus;
use crate::error::{CfResult, CipherForgeError};
use std::collections::BTreeMap;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lit {
    pub var: usize,
    pub positive: bool,
}

impl Lit {
    pub fn pos(var: usize) -> Self {
        Self {
            var,
            positive: true,
        }
    }

    pub fn neg(var: usize) -> Self {
        Self {
            var,
            positive: false,
        }
    }
}

pub type Clause = Vec<Lit>;

/// Penalised when every listed variable is true at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftConjunction {
    pub vars: Vec<usize>,
    pub weight: u64,
}

/// Weighted partial MaxSAT instance: hard CNF clauses plus soft
/// conjunctions whose triggered weights are minimised.
#[derive(Debug, Clone, Default)]
pub struct Formula {
    pub num_vars: usize,
    pub hard: Vec<Clause>,
    pub soft: Vec<SoftConjunction>,
}

impl Formula {
    pub fn satisfies_hard(&self, assignment: &[bool]) -> bool {
        self.hard.iter().all(|clause| {
            clause
                .iter()
                .any(|lit| assignment[lit.var] == lit.positive)
        })
    }

    pub fn cost(&self, assignment: &[bool]) -> u64 {
        self.soft
            .iter()
            .filter(|s| s.vars.iter().all(|&v| assignment[v]))
            .map(|s| s.weight)
            .sum()
    }
}

fn at_most_one(vars: &[usize], hard: &mut Vec<Clause>) {
    for (i, &a) in vars.iter().enumerate() {
        for &b in &vars[i + 1..] {
            hard.push(vec![Lit::neg(a), Lit::neg(b)]);
        }
    }
}

fn exactly_one(vars: &[usize], hard: &mut Vec<Clause>) {
    hard.push(vars.iter().map(|&v| Lit::pos(v)).collect());
    at_most_one(vars, hard);
}

/// Exact search for the full mapping that realises the fewest penalty
/// patterns in the source corpus.
///
/// One boolean variable per candidate edge `(source, target)`. Every source
/// symbol gets exactly one outgoing edge; every target symbol gets exactly
/// one incoming edge when the alphabets have the same size, at most one when
/// the target alphabet is larger. Each corpus window that some substitution
/// could turn into a penalty pattern becomes a soft conjunction of that
/// window's edges.
#[derive(Debug, Clone)]
pub struct ConstraintOptimizer {
    source: Alphabet,
    target: Alphabet,
    patterns: Vec<String>,
    corpus: Corpus,
    pins: Mapping,
}

impl ConstraintOptimizer {
    pub fn new(source: Alphabet, target: Alphabet, patterns: Vec<String>, corpus: Corpus) -> Self {
        Self {
            source,
            target,
            patterns,
            corpus,
            pins: Mapping::new(),
        }
    }

    /// Edges the analyst has already decided on; they become hard unit
    /// clauses.
    pub fn with_pins(mut self, pins: Mapping) -> Self {
        self.pins = pins;
        self
    }

    fn var(&self, from: char, to: char) -> Option<usize> {
        let s = self.source.index_of(from)?;
        let t = self.target.index_of(to)?;
        Some(s * self.target.len() + t)
    }

    fn edge(&self, var: usize) -> Option<(char, char)> {
        let n_t = self.target.len();
        Some((self.source.symbol(var / n_t)?, self.target.symbol(var % n_t)?))
    }

    pub fn encode(&self) -> CfResult<Formula> {
        let n_s = self.source.len();
        let n_t = self.target.len();

        if n_s > n_t {
            return Err(CipherForgeError::Infeasible(format!(
                "{} source symbols cannot map injectively onto {} target symbols",
                n_s, n_t
            )));
        }

        let mut hard = Vec::new();

        for s in 0..n_s {
            let vars: Vec<usize> = (0..n_t).map(|t| s * n_t + t).collect();
            exactly_one(&vars, &mut hard);
        }

        for t in 0..n_t {
            let vars: Vec<usize> = (0..n_s).map(|s| s * n_t + t).collect();
            if n_s == n_t {
                exactly_one(&vars, &mut hard);
            } else {
                at_most_one(&vars, &mut hard);
            }
        }

        for &(from, to) in self.pins.edges() {
            if !self.source.contains(from) {
                return Err(CipherForgeError::UnknownSymbol {
                    symbol: from,
                    alphabet: "source",
                });
            }
            let var = self.var(from, to).ok_or(CipherForgeError::UnknownSymbol {
                symbol: to,
                alphabet: "target",
            })?;
            hard.push(vec![Lit::pos(var)]);
        }

        let mut soft: BTreeMap<Vec<usize>, u64> = BTreeMap::new();
        for pattern in &self.patterns {
            let len = pattern.chars().count();
            if len == 0 {
                return Err(CipherForgeError::Validation(
                    "Penalty patterns must not be empty".to_string(),
                ));
            }

            for line in self.corpus.lines() {
                let chars: Vec<char> = line.text.chars().collect();
                for window in chars.windows(len) {
                    let window: String = window.iter().collect();
                    let Some(m) =
                        match_across_alphabets(&window, pattern, &self.source, &self.target)?
                    else {
                        continue;
                    };
                    let mut vars: Vec<usize> = m
                        .edges()
                        .iter()
                        .filter_map(|&(f, t)| self.var(f, t))
                        .collect();
                    vars.sort_unstable();
                    *soft.entry(vars).or_insert(0) += 1;
                }
            }
        }

        let formula = Formula {
            num_vars: n_s * n_t,
            hard,
            soft: soft
                .into_iter()
                .map(|(vars, weight)| SoftConjunction { vars, weight })
                .collect(),
        };

        debug!(
            "Encoded {} edge variables, {} hard clauses, {} penalty conjunctions",
            formula.num_vars,
            formula.hard.len(),
            formula.soft.len()
        );
        Ok(formula)
    }

    pub fn solve(&self) -> CfResult<SearchOutcome> {
        let formula = self.encode()?;
        info!(
            "Solving {}x{} assignment against {} penalty patterns",
            self.source.len(),
            self.target.len(),
            self.patterns.len()
        );

        let mut solver = Solver::new(&formula);
        let Some(assignment) = solver.run() else {
            return Err(CipherForgeError::Infeasible(
                "no mapping satisfies the bijection and pinned edges".to_string(),
            ));
        };

        let mut mapping = Mapping::new();
        for (var, &on) in assignment.iter().enumerate() {
            if let (true, Some((from, to))) = (on, self.edge(var)) {
                mapping.insert(from, to);
            }
        }

        info!(
            "Minimum penalty {} after {} nodes: {}",
            solver.best_cost, solver.nodes, mapping
        );

        Ok(SearchOutcome {
            mapping,
            score: solver.best_cost as f64,
            strategy: Strategy::Constraint,
            iterations: solver.nodes,
        })
    }
}

impl MappingSearch for ConstraintOptimizer {
    fn strategy(&self) -> Strategy {
        Strategy::Constraint
    }

    fn find_mapping(&mut self) -> CfResult<SearchOutcome> {
        self.solve()
    }
}

/// Counts the penalty patterns `mapping` actually produces when decoding
/// `corpus`, without going through the formula.
pub fn penalty_occurrences(
    mapping: &Mapping,
    corpus: &Corpus,
    patterns: &[String],
    source: &Alphabet,
    target: &Alphabet,
) -> usize {
    let mut total = 0;
    for pattern in patterns {
        let pattern: Vec<char> = pattern.chars().collect();
        if pattern.is_empty() {
            continue;
        }
        for line in corpus.lines() {
            let chars: Vec<char> = line.text.chars().collect();
            for window in chars.windows(pattern.len()) {
                let realised = window.iter().zip(&pattern).all(|(&c, &p)| {
                    if source.contains(c) {
                        mapping.get(c) == Some(p)
                    } else {
                        c == p && !target.contains(c)
                    }
                });
                if realised {
                    total += 1;
                }
            }
        }
    }
    total
}

const UNASSIGNED: i8 = 0;
const TRUE: i8 = 1;
const FALSE: i8 = -1;

enum ClauseState {
    Satisfied,
    Open,
    Unit(Lit),
    Conflict,
}

/// Branch and bound over the hard clauses with unit propagation. The bound
/// is the weight of soft conjunctions that are already fully true; since
/// soft conjunctions only fire on true variables, anything left unassigned
/// once every clause with a positive literal is satisfied is set false.
struct Solver<'f> {
    formula: &'f Formula,
    values: Vec<i8>,
    trail: Vec<usize>,
    clause_occurs: Vec<Vec<usize>>,
    soft_occurs: Vec<Vec<usize>>,
    soft_true: Vec<usize>,
    floor: u64,
    cost: u64,
    best_cost: u64,
    best: Option<Vec<bool>>,
    nodes: usize,
}

impl<'f> Solver<'f> {
    fn new(formula: &'f Formula) -> Self {
        let mut clause_occurs = vec![Vec::new(); formula.num_vars];
        for (ci, clause) in formula.hard.iter().enumerate() {
            for lit in clause {
                clause_occurs[lit.var].push(ci);
            }
        }

        let mut soft_occurs = vec![Vec::new(); formula.num_vars];
        let mut floor = 0;
        for (si, soft) in formula.soft.iter().enumerate() {
            if soft.vars.is_empty() {
                floor += soft.weight;
            }
            for &v in &soft.vars {
                soft_occurs[v].push(si);
            }
        }

        Self {
            formula,
            values: vec![UNASSIGNED; formula.num_vars],
            trail: Vec::with_capacity(formula.num_vars),
            clause_occurs,
            soft_occurs,
            soft_true: vec![0; formula.soft.len()],
            floor,
            cost: floor,
            best_cost: u64::MAX,
            best: None,
            nodes: 0,
        }
    }

    fn run(&mut self) -> Option<Vec<bool>> {
        for ci in 0..self.formula.hard.len() {
            match self.clause_state(ci) {
                ClauseState::Conflict => return None,
                ClauseState::Unit(lit) => {
                    let head = self.trail.len();
                    self.assign(lit.var, lit.positive);
                    if !self.propagate(head) {
                        return None;
                    }
                }
                ClauseState::Satisfied | ClauseState::Open => {}
            }
        }

        self.search();
        self.best.take()
    }

    #[inline]
    fn lit_value(&self, lit: Lit) -> i8 {
        let v = self.values[lit.var];
        if lit.positive {
            v
        } else {
            -v
        }
    }

    fn assign(&mut self, var: usize, value: bool) {
        self.values[var] = if value { TRUE } else { FALSE };
        self.trail.push(var);
        if value {
            for &si in &self.soft_occurs[var] {
                self.soft_true[si] += 1;
                if self.soft_true[si] == self.formula.soft[si].vars.len() {
                    self.cost += self.formula.soft[si].weight;
                }
            }
        }
    }

    fn undo_to(&mut self, mark: usize) {
        while self.trail.len() > mark {
            let Some(var) = self.trail.pop() else {
                break;
            };
            if self.values[var] == TRUE {
                for &si in &self.soft_occurs[var] {
                    if self.soft_true[si] == self.formula.soft[si].vars.len() {
                        self.cost -= self.formula.soft[si].weight;
                    }
                    self.soft_true[si] -= 1;
                }
            }
            self.values[var] = UNASSIGNED;
        }
    }

    fn clause_state(&self, ci: usize) -> ClauseState {
        let mut open = 0;
        let mut last = None;
        for &lit in &self.formula.hard[ci] {
            match self.lit_value(lit) {
                TRUE => return ClauseState::Satisfied,
                UNASSIGNED => {
                    open += 1;
                    last = Some(lit);
                }
                _ => {}
            }
        }
        match (open, last) {
            (0, _) => ClauseState::Conflict,
            (1, Some(lit)) => ClauseState::Unit(lit),
            _ => ClauseState::Open,
        }
    }

    fn propagate(&mut self, mut head: usize) -> bool {
        while head < self.trail.len() {
            let var = self.trail[head];
            head += 1;
            for k in 0..self.clause_occurs[var].len() {
                let ci = self.clause_occurs[var][k];
                match self.clause_state(ci) {
                    ClauseState::Conflict => return false,
                    ClauseState::Unit(lit) => self.assign(lit.var, lit.positive),
                    ClauseState::Satisfied | ClauseState::Open => {}
                }
            }
        }
        true
    }

    /// Weight of soft conjunctions a variable could still help trigger.
    fn pressure(&self, lit: &Lit) -> u64 {
        if !lit.positive {
            return 0;
        }
        self.soft_occurs[lit.var]
            .iter()
            .map(|&si| self.formula.soft[si].weight)
            .sum()
    }

    /// The open literals of the unsatisfied clause with the fewest open
    /// literals, among clauses that still have an open positive literal.
    fn pick_branch(&self) -> Option<Vec<Lit>> {
        let mut best: Option<(usize, usize)> = None;

        for (ci, clause) in self.formula.hard.iter().enumerate() {
            let mut open = 0;
            let mut has_positive = false;
            let mut satisfied = false;
            for &lit in clause {
                match self.lit_value(lit) {
                    TRUE => {
                        satisfied = true;
                        break;
                    }
                    UNASSIGNED => {
                        open += 1;
                        has_positive |= lit.positive;
                    }
                    _ => {}
                }
            }
            if satisfied || !has_positive {
                continue;
            }
            if best.map_or(true, |(n, _)| open < n) {
                best = Some((open, ci));
            }
        }

        best.map(|(_, ci)| {
            let mut lits: Vec<Lit> = self.formula.hard[ci]
                .iter()
                .copied()
                .filter(|&l| self.lit_value(l) == UNASSIGNED)
                .collect();
            lits.sort_by_key(|l| self.pressure(l));
            lits
        })
    }

    /// Sets `lit` true and propagates. False on conflict.
    fn force(&mut self, lit: Lit) -> bool {
        match self.lit_value(lit) {
            TRUE => true,
            FALSE => false,
            _ => {
                let head = self.trail.len();
                self.assign(lit.var, lit.positive);
                self.propagate(head)
            }
        }
    }

    fn search(&mut self) {
        self.nodes += 1;
        if self.cost >= self.best_cost {
            return;
        }

        let Some(lits) = self.pick_branch() else {
            self.best_cost = self.cost;
            self.best = Some(self.values.iter().map(|&v| v == TRUE).collect());
            return;
        };

        let mark = self.trail.len();
        for i in 0..lits.len() {
            if self.best_cost <= self.floor {
                break;
            }
            // branch i: lits[i] true, every earlier alternative false
            let ok = lits[..i].iter().all(|&l| {
                self.force(Lit {
                    var: l.var,
                    positive: !l.positive,
                })
            }) && self.force(lits[i]);

            if ok {
                self.search();
            }
            self.undo_to(mark);
        }
    }
}
