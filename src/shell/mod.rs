mod options;

use std::io::{BufRead, Write};

use crossbeam_channel::Receiver;
use itertools::Itertools;
pub use options::ShellOptions;

use crate::grid::{notation::{parse_board_list, parse_dimensions}, prelude::*};

/// A line-oriented command server over one session of boards and entities.
///
/// Every command is answered by its output lines and then `ok`; a failed command is answered by
/// `err`, the error message and then `ok`. Failed commands never end the session.
pub struct Shell {
    registry: BoardRegistry,
    entities: BTreeMap<EntityId, Placeable>,
    placer: AutoPlacer,
    effects: BTreeMap<BoardType, CellEffectMap>,
    receivers: BTreeMap<BoardType, Receiver<BoardEvent>>,
    options: ShellOptions,
}

impl Shell {
    /// Produces a new shell, loading the session file named in the options if there is one.
    pub fn new(options: ShellOptions) -> Result<Shell> {
        let session = match &options.session {
            Some(path) => SessionConfig::load(path)?,
            None       => SessionConfig::default(),
        };
        let mut shell = Shell {
            registry: BoardRegistry::new(),
            entities: BTreeMap::new(),
            placer: AutoPlacer::default(),
            effects: BTreeMap::new(),
            receivers: BTreeMap::new(),
            options,
        };
        shell.install_session(&session);
        Ok(shell)
    }

    /// Serves commands until `quit` or the end of the input.
    pub fn run(&mut self, input: impl BufRead, mut output: impl Write) -> Result<()> {
        if !self.options.quiet {
            writeln!(output, "{}", self.banner())?;
        }
        for line in input.lines() {
            let line = line?;
            let quit = line.split_whitespace().next() == Some("quit");
            let response = match quit {
                | true => self.ok(vec![]),
                | _ => self.respond(&line),
            };
            for response in &response {
                writeln!(output, "{response}")?;
            }
            output.flush()?;
            if quit {
                break;
            }
        }
        log::info!("session over with {} entit(ies) on {} board(s)", self.entities.len(), self.registry.len());
        Ok(())
    }

    /// Runs one command line, producing the full response including the trailing `ok`.
    pub fn respond(&mut self, line: &str) -> Vec<String> {
        let args = line.split_whitespace().collect::<Vec<_>>();
        let cmd = args.first().copied().unwrap_or("");
        let rest = args.get(1..).unwrap_or(&[]);

        match self.apply(cmd, rest) {
            | Ok(mut lines) => {
                log::debug!("Command completed successfully: {cmd} {}", rest.join(" "));
                lines.extend(self.drain_events());
                self.ok(lines)
            }
            | Err(err) => {
                log::warn!("encountered recoverable error:\n{err:#}");
                self.drain_events();
                self.err(&err)
            }
        }
    }

    /// Runs a command.
    fn apply(&mut self, cmd: &str, args: &[&str]) -> Result<Vec<String>> {
        match cmd {
            | "" => Ok(vec![]),
            | "at" => self.at(args),
            | "autoplace" => self.autoplace(args),
            | "board" => self.board(args),
            | "info" => Ok(vec![self.banner()]),
            | "load" => self.load(args),
            | "lock" => self.lock(args),
            | "move" => self.move_entity(args),
            | "neighbours" => self.neighbours(args),
            | "place" => self.place(args),
            | "pretty" => self.pretty(args),
            | "remove" => self.remove(args),
            | "restore" => self.restore(args),
            | "rotate" => self.rotate(args),
            | "snapshot" => self.snapshot(args),
            | "spawn" => self.spawn(args),
            | "tag" => self.tag(args),
            | _ => Err(anyhow!("unrecognized command {cmd}")),
        }
    }

    /// Answers a failed command: `err`, the message, then the usual `ok`.
    fn err(&self, err: &Error) -> Vec<String> {
        self.ok(vec!["err".to_owned(), format!("{err:#}")])
    }

    /// Closes a response with `ok`.
    fn ok(&self, mut lines: Vec<String>) -> Vec<String> {
        lines.push("ok".to_owned());
        lines
    }

    // session

    fn load(&mut self, args: &[&str]) -> Result<Vec<String>> {
        let [path] = args else {
            return Err(anyhow!("usage: load <path>"));
        };
        let session = SessionConfig::load(path)?;
        self.install_session(&session);
        Ok(vec![format!("boards {}", self.registry.boards().map(|b| b.kind()).join(","))])
    }

    /// Replaces every board with the session's; entities are all left unplaced.
    fn install_session(&mut self, session: &SessionConfig) -> () {
        self.entities.values_mut().for_each(|e| e.detach());
        self.registry = session.build_registry();
        self.placer = session.auto_placer();
        self.receivers.clear();
        let kinds = self.registry.boards().map(|b| b.kind()).collect::<Vec<_>>();
        for kind in kinds {
            self.subscribe(kind);
        }
    }

    fn board(&mut self, args: &[&str]) -> Result<Vec<String>> {
        let (kind, size, shape) = match args {
            [kind, size]        => (kind, size, BoardShape::Rectangle),
            [kind, size, shape] => (kind, size, shape.parse::<BoardShape>()?),
            _ => return Err(anyhow!("usage: board <kind> <cols>x<rows> [shape]")),
        };
        let kind = kind.parse::<BoardType>()?;
        let (columns, rows) = parse_dimensions(size)?;
        let board = Board::new(&BoardConfig::rectangle(kind, columns, rows).with_shape(shape.clone()));
        let cells = board.allowed_count();

        if let Some(previous) = self.registry.register(board) {
            for (id, _) in previous.occupants() {
                if let Some(entity) = self.entities.get_mut(&id) {
                    entity.detach();
                }
            }
        }
        self.placer.append(kind);
        self.subscribe(kind);
        Ok(vec![format!("board {kind} {columns}x{rows} {} ({cells} cells)", shape.notate())])
    }

    fn subscribe(&mut self, kind: BoardType) -> () {
        if let Some(board) = self.registry.get_mut(kind) {
            self.receivers.insert(kind, board.subscribe());
        }
    }

    // entities

    fn spawn(&mut self, args: &[&str]) -> Result<Vec<String>> {
        let [id, size] = args else {
            return Err(anyhow!("usage: spawn <id> <w>x<h>"));
        };
        let id = id.parse::<EntityId>()?;
        let footprint = size.parse::<Footprint>()?;
        if self.entities.contains_key(&id) {
            return Err(anyhow!("entity {id} already exists"));
        }
        self.entities.insert(id, Placeable::new(id, footprint));
        Ok(vec![format!("spawned {id} {}", footprint.notate())])
    }

    fn rotate(&mut self, args: &[&str]) -> Result<Vec<String>> {
        let [id] = args else {
            return Err(anyhow!("usage: rotate <id>"));
        };
        let entity = lookup(&mut self.entities, id)?;
        entity.rotate();
        if let Some(board) = entity.current_board() {
            log::info!("entity {} keeps its cells on the {board} board until it is moved", entity.id());
        }
        Ok(vec![format!("{} {}", entity.id(), entity.footprint().notate())])
    }

    fn place(&mut self, args: &[&str]) -> Result<Vec<String>> {
        let [id, kind, origin] = args else {
            return Err(anyhow!("usage: place <id> <board> <col>,<row>"));
        };
        let (kind, origin) = (kind.parse::<BoardType>()?, origin.parse::<Coord>()?);
        let entity = lookup(&mut self.entities, id)?;
        self.registry.require_mut(kind)?.try_place(entity, origin)?;
        Ok(vec![format!("placed {} {kind} {}", entity.id(), origin.notate())])
    }

    fn remove(&mut self, args: &[&str]) -> Result<Vec<String>> {
        let [id] = args else {
            return Err(anyhow!("usage: remove <id>"));
        };
        let entity = lookup(&mut self.entities, id)?;
        let removed_from = match entity.current_board().and_then(|kind| self.registry.get_mut(kind)) {
            Some(board) => board.remove(entity).then_some(board.kind()),
            None        => None,
        };
        Ok(vec![match removed_from {
            Some(kind) => format!("removed {} {kind}", entity.id()),
            None       => format!("{} was not placed", entity.id()),
        }])
    }

    fn move_entity(&mut self, args: &[&str]) -> Result<Vec<String>> {
        let [id, kind, origin] = args else {
            return Err(anyhow!("usage: move <id> <board> <col>,<row>"));
        };
        let (kind, origin) = (kind.parse::<BoardType>()?, origin.parse::<Coord>()?);
        let entity = lookup(&mut self.entities, id)?;
        self.registry.move_to_board(entity, kind, origin)?;
        Ok(vec![format!("moved {} {kind} {}", entity.id(), origin.notate())])
    }

    fn autoplace(&mut self, args: &[&str]) -> Result<Vec<String>> {
        let (id, placer) = match args {
            [id]        => (id, self.placer.clone()),
            [id, kinds] => (id, AutoPlacer::new(parse_board_list(kinds)?)),
            _ => return Err(anyhow!("usage: autoplace <id> [<board>,<board>...]")),
        };
        let entity = lookup(&mut self.entities, id)?;
        let kind = placer.place(&mut self.registry, entity)?;
        Ok(vec![format!("placed {} {kind} {}", entity.id(), entity.origin().notate())])
    }

    // queries

    fn neighbours(&mut self, args: &[&str]) -> Result<Vec<String>> {
        let (id, direction) = match args {
            [id]            => (id, None),
            [id, direction] => (id, Some(direction.parse::<Direction>()?)),
            _ => return Err(anyhow!("usage: neighbours <id> [direction]")),
        };
        let entity = lookup(&mut self.entities, id)?;
        let board = entity
            .current_board()
            .and_then(|kind| self.registry.get(kind))
            .ok_or_else(|| anyhow!("entity {} is not placed", entity.id()))?;
        let found = match direction {
            Some(direction) => board.neighbours(entity.id(), direction),
            None            => board.all_neighbours(entity.id()),
        };
        Ok(vec![match found.is_empty() {
            true => "none".to_owned(),
            _    => found.iter().join(" "),
        }])
    }

    fn lock(&mut self, args: &[&str]) -> Result<Vec<String>> {
        let (kind, percent, from_end) = match args {
            [kind, percent]          => (kind, percent, false),
            [kind, percent, "end"]   => (kind, percent, true),
            [kind, percent, "start"] => (kind, percent, false),
            _ => return Err(anyhow!("usage: lock <board> <percent> [start|end]")),
        };
        let kind = kind.parse::<BoardType>()?;
        let percent = percent.parse::<f64>().with_context(|| format!("bad lock percentage {percent}"))?;
        let locked = self.registry.require_mut(kind)?.apply_partial_lock(percent, from_end);
        Ok(vec![format!("locked {locked} {kind}")])
    }

    fn pretty(&mut self, args: &[&str]) -> Result<Vec<String>> {
        let [kind] = args else {
            return Err(anyhow!("usage: pretty <board>"));
        };
        let kind = kind.parse::<BoardType>()?;
        let board = self.registry.get(kind).ok_or(PlacementError::UnknownBoard { board: kind })?;
        Ok(board.pretty().lines().map(str::to_owned).collect())
    }

    fn at(&mut self, args: &[&str]) -> Result<Vec<String>> {
        let [position] = args else {
            return Err(anyhow!("usage: at <x>,<y>"));
        };
        let position = position.parse::<Vec2>()?;
        Ok(vec![match self.registry.board_at_position(&position) {
            Some(board) => {
                let coord = board.position_to_coord(&position);
                match board.occupant(&coord) {
                    Some(id) => format!("{} {} {id}", board.kind(), coord.notate()),
                    None     => format!("{} {}", board.kind(), coord.notate()),
                }
            }
            None => "none".to_owned(),
        }])
    }

    fn tag(&mut self, args: &[&str]) -> Result<Vec<String>> {
        let [kind, coord, label] = args else {
            return Err(anyhow!("usage: tag <board> <col>,<row> <label>"));
        };
        let (kind, coord) = (kind.parse::<BoardType>()?, coord.parse::<Coord>()?);
        self.effects.entry(kind).or_default().tag(coord, *label);
        Ok(vec![format!("tagged {kind} {} {label}", coord.notate())])
    }

    // persistence

    fn snapshot(&mut self, args: &[&str]) -> Result<Vec<String>> {
        let [kind] = args else {
            return Err(anyhow!("usage: snapshot <board>"));
        };
        let kind = kind.parse::<BoardType>()?;
        let board = self.registry.get(kind).ok_or(PlacementError::UnknownBoard { board: kind })?;
        Ok(vec![serde_json::to_string(&board.snapshot())?])
    }

    fn restore(&mut self, args: &[&str]) -> Result<Vec<String>> {
        let Some((kind, json)) = args.split_first().filter(|(_, json)| !json.is_empty()) else {
            return Err(anyhow!("usage: restore <board> <json>"));
        };
        let kind = kind.parse::<BoardType>()?;
        let snapshot = serde_json::from_str::<BoardSnapshot>(&json.join(" ")).context("malformed snapshot")?;
        self.registry.require_mut(kind)?.restore(&snapshot, &mut self.entities)?;
        Ok(vec![format!("restored {kind} with {} unit(s)", snapshot.units.len())])
    }

    // printers

    /// The shell's identification line.
    fn banner(&self) -> String {
        format!("id {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }

    /// Collects what the boards announced during the last command, answering each placement with the
    /// cell labels lying under it.
    fn drain_events(&self) -> Vec<String> {
        let mut lines = vec![];
        for (kind, receiver) in &self.receivers {
            for event in receiver.try_iter() {
                log::trace!("{kind} board: {event:?}");
                let Some(effects) = self.effects.get(kind) else {
                    continue;
                };
                for (coord, labels) in effects.labels_under(&event) {
                    lines.push(format!("effect {} {} {}", event.entity(), coord.notate(), labels.join(",")));
                }
            }
        }
        lines
    }
}

/// Finds a spawned entity by its notated id.
fn lookup<'a>(entities: &'a mut BTreeMap<EntityId, Placeable>, id: &str) -> Result<&'a mut Placeable> {
    let id = id.parse::<EntityId>().with_context(|| format!("bad entity id {id}"))?;
    entities.get_mut(&id).ok_or_else(|| PlacementError::UnknownEntity { entity: id }.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell() -> Shell {
        let mut shell = Shell::new(ShellOptions::default()).unwrap();
        for line in ["board battle 4x3", "board bench 3x1", "spawn 1 2x1", "spawn 2 1x1", "spawn 3 1x2"] {
            assert_eq!(shell.respond(line).last().map(String::as_str), Some("ok"));
        }
        shell
    }

    fn output(shell: &mut Shell, line: &str) -> Vec<String> {
        let mut response = shell.respond(line);
        assert_eq!(response.pop().as_deref(), Some("ok"));
        response
    }

    #[test]
    fn place_query_and_render() {
        let mut s = shell();
        assert_eq!(output(&mut s, "place 1 battle 0,0"), vec!["placed 1 battle 0,0"]);
        assert_eq!(output(&mut s, "place 2 battle 2,0"), vec!["placed 2 battle 2,0"]);
        assert_eq!(output(&mut s, "neighbours 1 right"), vec!["2"]);
        assert_eq!(output(&mut s, "neighbours 2"), vec!["1"]);
        assert_eq!(output(&mut s, "neighbours 1 up"), vec!["none"]);
        assert_eq!(output(&mut s, "pretty battle"), vec!["....", "....", "112."]);
        assert_eq!(output(&mut s, "at 1.5,0.5"), vec!["battle 1,0 1"]);
        assert_eq!(output(&mut s, "at 9,9"), vec!["none"]);
    }

    #[test]
    fn errors_are_reported_and_recoverable() {
        let mut s = shell();
        assert_eq!(s.respond("launch"), vec!["err", "unrecognized command launch", "ok"]);
        assert_eq!(s.respond("place 9 battle 0,0"), vec!["err", "entity 9 is unknown", "ok"]);

        let response = s.respond("place 1 battle 3,0");
        assert_eq!(response[0], "err");
        assert!(response[1].contains("does not fit"));
        assert_eq!(s.respond("place 1 shop 0,0"), vec!["err", "no shop board is registered", "ok"]);
        assert_eq!(output(&mut s, "place 1 battle 2,0"), vec!["placed 1 battle 2,0"]);
        assert_eq!(s.respond(""), vec!["ok"]);
    }

    #[test]
    fn origins_past_the_integer_range_are_refused() {
        let mut s = Shell::new(ShellOptions::default()).unwrap();
        output(&mut s, "board battle 4x4");
        output(&mut s, "spawn 1 2x1");

        for origin in ["2147483647,0", "0,2147483647", "-2147483648,-2147483648"] {
            let response = s.respond(&format!("place 1 battle {origin}"));
            assert_eq!(response.len(), 3, "{origin}");
            assert_eq!(response[0], "err");
            assert!(response[1].contains("does not fit"), "{}", response[1]);
            assert_eq!(s.respond(&format!("move 1 battle {origin}"))[0], "err");
        }
        assert_eq!(s.respond("place 1 battle 2147483648,0")[0], "err");
        assert_eq!(output(&mut s, "place 1 battle 2,3"), vec!["placed 1 battle 2,3"]);
    }

    #[test]
    fn remove_is_a_no_op_for_unplaced_entities() {
        let mut s = shell();
        assert_eq!(output(&mut s, "remove 1"), vec!["1 was not placed"]);
        output(&mut s, "place 1 bench 0,0");
        assert_eq!(output(&mut s, "remove 1"), vec!["removed 1 bench"]);
        assert_eq!(output(&mut s, "remove 1"), vec!["1 was not placed"]);
    }

    #[test]
    fn move_and_autoplace() {
        let mut s = shell();
        output(&mut s, "place 1 bench 0,0");
        assert_eq!(output(&mut s, "move 1 battle 1,1"), vec!["moved 1 battle 1,1"]);
        assert_eq!(s.respond("move 1 bench 2,0")[0], "err");
        assert_eq!(output(&mut s, "pretty bench"), vec!["..."]);
        assert_eq!(output(&mut s, "pretty battle"), vec!["....", ".11.", "...."]);

        // boards are tried in the order they were created
        assert_eq!(output(&mut s, "autoplace 2"), vec!["placed 2 battle 0,0"]);
        assert_eq!(output(&mut s, "autoplace 3 bench,battle"), vec!["placed 3 battle 3,0"]);
    }

    #[test]
    fn locking_and_snapshots() {
        let mut s = shell();
        assert_eq!(output(&mut s, "lock battle 0.25 end"), vec!["locked 3 battle"]);
        output(&mut s, "place 3 battle 0,0");
        let json = output(&mut s, "snapshot battle").remove(0);
        assert!(json.contains("\"units\""));

        output(&mut s, "lock battle 0");
        output(&mut s, "remove 3");
        output(&mut s, "place 2 battle 3,2");
        assert_eq!(output(&mut s, &format!("restore battle {json}")), vec!["restored battle with 1 unit(s)"]);
        assert_eq!(output(&mut s, "pretty battle"), vec![".xxx", "3...", "3..."]);
        assert_eq!(output(&mut s, "remove 2"), vec!["2 was not placed"]);
    }

    #[test]
    fn effects_are_reported_on_placement() {
        let mut s = shell();
        output(&mut s, "tag battle 1,0 burning");
        output(&mut s, "tag battle 1,0 haste");
        assert_eq!(
            output(&mut s, "place 1 battle 0,0"),
            vec!["placed 1 battle 0,0", "effect 1 1,0 burning,haste"]
        );
        assert_eq!(output(&mut s, "remove 1"), vec!["removed 1 battle"]);
    }

    #[test]
    fn replacing_a_board_unplaces_its_entities() {
        let mut s = shell();
        output(&mut s, "place 1 battle 0,0");
        assert_eq!(output(&mut s, "board battle 3x3 right"), vec!["board battle 3x3 right_triangle (6 cells)"]);
        assert_eq!(s.respond("neighbours 1"), vec!["err", "entity 1 is not placed", "ok"]);
        assert_eq!(output(&mut s, "pretty battle"), vec!["...", "..#", ".##"]);
    }

    #[test]
    fn run_serves_until_quit() {
        let mut s = shell();
        let input = "info\nspawn 4 1x1\nquit\nspawn 5 1x1\n";
        let mut out = Vec::new();
        s.run(input.as_bytes(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let banner = format!("id {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        assert_eq!(text, format!("{banner}\n{banner}\nok\nspawned 4 1x1\nok\nok\n"));
        assert_eq!(s.respond("spawn 5 1x1"), vec!["spawned 5 1x1", "ok"]);
    }
}
