/*!

This is the long-form manual for `instant_runoff`.

## The tabulation algorithm

The engine runs a sequence of rounds over a shrinking set of *active*
candidates. Each round:

1. **Shift.** Every ballot advances to its most-preferred candidate that is
   still active (its *effective head*). A ballot with no active candidate
   left becomes exhausted and never contributes to a tally again.
2. **Tally.** The effective heads of all valid ballots are counted. The
   tally is total over the active set: a candidate with no support appears
   with a count of zero.
3. **Majority.** A candidate holding strictly more than half of the valid
   ballots wins immediately. At most one candidate can do so, hence no tie
   is possible at this step.
4. **Elimination.** Otherwise the candidate with the fewest votes is
   removed from the active set. Candidates are scanned in registration
   order; when two candidates share the current minimum, the tie-break
   below decides which of the two remains the elimination target.

The loop ends when a single candidate remains, who wins by elimination even
if every ballot has been exhausted. An election with no candidates or no
ballots has no winner, which is an ordinary outcome rather than an error.

## The tie-break

Two candidates tied for fewest first-preference votes are separated by
looking at deeper preference levels. Let `A` be the provisional elimination
target (the earlier one in scan order) and `B` the challenger. Collect the
ballots currently headed by `A` and those headed by `B`. Then, for level 2,
3, ...:

- count the ballots headed by `B` that rank `A` at this level, and the
  ballots headed by `A` that rank `B` at this level;
- the candidate with the *smaller* of these cross-counts is eliminated;
- equal counts move one level deeper.

If no ballot in either pool ranks deep enough to separate the pair, the
provisional candidate `A` is eliminated. Both outcomes depend only on the
ordered pair and the ballots, so repeated tabulations of the same election
are bit-for-bit identical. There is deliberately no random tie-break mode.

Note that the comparison is a *cross*-tally: each candidate is scored by the
deeper support found in the *other* candidate's pool, not in their own. This
asymmetric rule is part of the counting method this engine implements and is
applied exactly as stated, not replaced with a symmetric comparison.

## Malformed input

A ballot entry that names no registered candidate is skipped when the ballot
is interned; such entries are never counted at any level. A ballot whose
entries are all unknown starts out exhausted. Registering two candidates
under the same name is the one construction-time error
([`crate::VotingErrors::DuplicateCandidate`]).

## Diagnostics

All per-round diagnostics (starting candidate set, tallies, eliminations)
are emitted through the [`log`](https://docs.rs/log) facade. They go to the
debug level by default and to the info level when `get_winner` is called
with `verbose = true`; the flag never changes the result. Attach any
`log`-compatible logger (the tests use `env_logger`) to see them.

*/
