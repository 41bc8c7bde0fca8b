//! Session loop wiring the world, systems and a rendering backend together.

use anyhow::{Context, Result};
use ocean_descent_core::{Command, CurrentField, Event};
use ocean_descent_rendering::{Frame, GridPresentation, RenderingBackend, DEFAULT_WINDOW_WIDTH};
use ocean_descent_system_drift::Drift;
use ocean_descent_system_hud::Hud;
use ocean_descent_system_ingestion::{partition, Dataset};
use ocean_descent_world::{self as world, query, World};

use crate::{config::SessionConfig, script::Input};

/// Outcome of running a script to completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SessionSummary {
    /// Inputs that were processed.
    pub(crate) steps: usize,
    /// Whether the dive ended because fuel ran out.
    pub(crate) out_of_fuel: bool,
    /// Objects collected during the dive.
    pub(crate) collected: u32,
}

pub(crate) struct Session {
    world: World,
    hud: Hud,
    drift: Option<Drift>,
    currents: CurrentField,
    presentation: GridPresentation,
}

impl Session {
    pub(crate) fn new(config: &SessionConfig, dataset: &Dataset) -> Result<Self> {
        let mut policy = config.data.assignment(config.world.layer_count)?;
        let tables = partition(dataset, policy.as_mut());
        let world =
            World::new(config.world.clone(), &tables).context("invalid world configuration")?;
        let presentation = GridPresentation::fit_width(query::play_grid(&world), DEFAULT_WINDOW_WIDTH)
            .context("play grid does not fit the window")?;

        Ok(Self {
            world,
            hud: Hud::new(config.hud),
            drift: config
                .drift
                .enabled
                .then(|| Drift::new(config.drift.seed)),
            currents: dataset.current_field(),
            presentation,
        })
    }

    /// Applies one input and returns the events the world emitted.
    pub(crate) fn step(&mut self, input: Input) -> Vec<Event> {
        let mut commands = Vec::new();
        match input {
            Input::Click(cell) => commands.push(Command::SelectCell { cell }),
            Input::Pixel(pixel) => match self.presentation.cell_at_pixel(pixel) {
                Some(cell) => commands.push(Command::SelectCell { cell }),
                None => tracing::debug!(?pixel, "click landed outside the grid"),
            },
            Input::Descend => commands.push(Command::Descend),
            Input::Ascend => commands.push(Command::Ascend),
            Input::Tick => {
                if let Some(drift) = self.drift.as_mut() {
                    drift.handle(
                        query::selected(&self.world),
                        &self.currents,
                        query::scale(&self.world),
                        &mut commands,
                    );
                }
            }
            Input::Refuel(amount) => self.hud.refuel(amount),
        }

        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        for event in &events {
            tracing::debug!(?event, "world event");
        }
        self.hud.handle(&events);
        events
    }

    pub(crate) fn frame(&self) -> Frame {
        Frame::capture(&self.world, self.hud.meters())
    }

    /// Feeds inputs until they run out or the fuel meter empties, presenting
    /// a frame after each one.
    pub(crate) fn run<B>(&mut self, inputs: Vec<Input>, backend: &mut B) -> Result<SessionSummary>
    where
        B: RenderingBackend + ?Sized,
    {
        backend.present(&self.frame())?;
        let mut steps = 0;
        for input in inputs {
            if self.hud.fuel_depleted() {
                break;
            }
            let _ = self.step(input);
            steps += 1;
            backend.present(&self.frame())?;
        }

        let out_of_fuel = self.hud.fuel_depleted();
        if out_of_fuel {
            tracing::info!(steps, "dive ended with empty fuel tank");
        }
        Ok(SessionSummary {
            steps,
            out_of_fuel,
            collected: self.hud.collected_total(),
        })
    }
}
