/*
* Task Scheduler
*   Cooperative, every task is ticked once per base tick and dispatched at most once per pass
*/

use super::*;

/* --------------------------- Code -------------------------- */
pub struct Scheduler<'a, const N: usize> {
    tasks: Vec<&'a RefCell<dyn PeriodicTask + 'a>, N>,
    base_tick_us: u32,
}

impl<'a, const N: usize> Scheduler<'a, N> {
    pub fn new(base_tick_us: u32) -> Self {
        Self {
            tasks: Vec::new(),
            base_tick_us,
        }
    }

    /// Tasks are dispatched in registration order.
    pub fn register(&mut self, task: &'a RefCell<dyn PeriodicTask + 'a>) -> Result<(), ConfigError> {
        self.tasks.push(task).map_err(|_| ConfigError::SchedulerFull)
    }

    /// Base timer callback.
    pub fn tick(&self) {
        for task in self.tasks.iter() {
            let Ok(mut task) = task.try_borrow_mut() else { continue; };
            task.tick();
        }
    }

    /// One scheduler pass, returns how many task bodies ran.
    pub fn dispatch(&self) -> usize {
        let mut ran = 0;

        for task in self.tasks.iter() {
            let Ok(mut task) = task.try_borrow_mut() else {
                log::warn!("Task busy, skipped this pass");
                continue;
            };

            if task.dispatch() {
                ran += 1;
            }
        }

        return ran;
    }

    pub fn len(&self) -> usize {
        return self.tasks.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.tasks.is_empty();
    }

    pub fn base_tick_us(&self) -> u32 {
        return self.base_tick_us;
    }
}

/* --------------------------- Test -------------------------- */
