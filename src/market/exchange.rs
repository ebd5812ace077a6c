//! Thread-safe exchange service.
//!
//! This module provides [`Exchange`], which owns one [`Inventory`], one
//! [`RequestQueue`] and one [`MatchingEngine`] and is the entry point for
//! presentation layers (GUI callbacks, HTTP handlers, CLIs).
//!
//! # Design
//!
//! All state sits behind a single `parking_lot::Mutex`; every public call
//! takes the lock once and releases it before returning, so calls from
//! several threads are serialized and never observe a half-applied
//! mutation.
//!
//! # Validation
//!
//! The core types trust their inputs. The exchange is where raw user text
//! is checked: fields are trimmed and must be non-empty, listing fields
//! must fit the snapshot line format, prices must parse as non-negative
//! decimals, and urgency must fall inside [`Config::urgency_range`].

use std::str::FromStr;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::{Inventory, MatchLogEntry, MatchStats, MatchingEngine, RequestQueue};
use crate::config::Config;
use crate::error::Error;
use crate::snapshot;
use crate::types::{Item, Price, Request, SubmissionId, Urgency};
use crate::Result;

/// Raw fields for listing a book
#[derive(Debug, Clone, Copy, Default)]
pub struct ListingForm<'a> {
    /// Book title
    pub title: &'a str,
    /// Course code
    pub course_code: &'a str,
    /// Price as typed, e.g. `"49.99"`
    pub price: &'a str,
    /// Seller name
    pub seller: &'a str,
}

/// Raw fields for requesting a book
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestForm<'a> {
    /// Wanted title
    pub title: &'a str,
    /// Requester name
    pub requester: &'a str,
    /// Urgency as typed, e.g. `"3"`
    pub urgency: &'a str,
}

#[derive(Debug, Default, Clone)]
struct State {
    inventory: Inventory,
    requests: RequestQueue,
    engine: MatchingEngine,
}

/// Book exchange service
///
/// # Thread Safety
///
/// Safe to share across threads via `Arc<Exchange>`.
///
/// # Example
///
/// ```rust
/// use book_exchange::{Config, Exchange, ListingForm, RequestForm};
///
/// # fn example() -> book_exchange::Result<()> {
/// let exchange = Exchange::new(Config::new())?;
///
/// exchange.list_item(ListingForm {
///     title: "Intro to CS",
///     course_code: "CS134",
///     price: "49.99",
///     seller: "Alice",
/// })?;
/// exchange.request_item(RequestForm {
///     title: "intro to cs",
///     requester: "Bob",
///     urgency: "2",
/// })?;
///
/// for entry in exchange.process()? {
///     println!("{entry}");
/// }
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Debug)]
pub struct Exchange {
    config: Config,
    state: Mutex<State>,
}

impl Exchange {
    /// Create an exchange with empty inventory
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_inventory(config, Inventory::new())
    }

    /// Create an exchange, restoring inventory from the configured snapshot
    ///
    /// A missing snapshot file is not an error; the exchange starts empty.
    /// Malformed lines in an existing file are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the snapshot
    /// file exists but cannot be read.
    pub fn open(config: Config) -> Result<Self> {
        let inventory = match config.snapshot_path() {
            Some(path) if path.exists() => {
                let restored = snapshot::load(path)?;
                info!(
                    path = %path.display(),
                    loaded = restored.loaded,
                    skipped = restored.skipped,
                    "inventory restored"
                );
                restored.inventory
            }
            Some(path) => {
                debug!(path = %path.display(), "no snapshot yet, starting empty");
                Inventory::new()
            }
            None => Inventory::new(),
        };
        Self::with_inventory(config, inventory)
    }

    /// Create an exchange around an existing inventory
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid.
    pub fn with_inventory(config: Config, inventory: Inventory) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: Mutex::new(State {
                inventory,
                ..State::default()
            }),
        })
    }

    /// Validate and list a book
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an empty field, a field holding
    /// the snapshot separator or a line break, an unparsable price, or a
    /// negative price.
    pub fn list_item(&self, form: ListingForm<'_>) -> Result<Item> {
        let title = storable("title", form.title)?;
        let course_code = storable("course code", form.course_code)?;
        let seller = storable("seller", form.seller)?;
        let price = parse_price(form.price)?;

        let item = Item::new(title, course_code, price, seller);
        let id = self.state.lock().inventory.add_item(item.clone());
        debug!(%id, title = item.title(), seller = item.seller(), "item listed");
        Ok(item)
    }

    /// Validate and queue a request
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an empty field or an urgency that
    /// is not an integer inside the configured range.
    pub fn request_item(&self, form: RequestForm<'_>) -> Result<Request> {
        let title = required("title", form.title)?;
        let requester = required("requester", form.requester)?;
        let urgency = self.parse_urgency(form.urgency)?;

        let request = Request::new(title, requester, urgency);
        self.state.lock().requests.submit(request.clone());
        debug!(
            id = %request.submitted_at(),
            title = request.title(),
            urgency,
            "request queued"
        );
        Ok(request)
    }

    /// Run the matching engine over every pending request
    ///
    /// With autosave enabled, the batch runs against a staged copy of the
    /// state, the staged inventory is written to the snapshot file, and only
    /// then is the copy committed. The lock is held throughout.
    ///
    /// # Errors
    ///
    /// Returns an error only if autosave fails. Nothing is applied in that
    /// case: inventory, pending requests, and stats are as before the call.
    pub fn process(&self) -> Result<Vec<MatchLogEntry>> {
        let mut state = self.state.lock();

        let autosave_path = self
            .config
            .snapshot_path()
            .filter(|_| self.config.autosave());
        let Some(path) = autosave_path else {
            let State {
                inventory,
                requests,
                engine,
            } = &mut *state;
            return Ok(engine.process(requests, inventory));
        };

        let mut staged = state.clone();
        let State {
            inventory,
            requests,
            engine,
        } = &mut staged;
        let log = engine.process(requests, inventory);

        if !log.is_empty() {
            if let Err(err) = snapshot::save(path, inventory) {
                warn!(
                    path = %path.display(),
                    error = %err,
                    requests = log.len(),
                    "autosave failed, batch rolled back"
                );
                return Err(err);
            }
        }

        *state = staged;
        Ok(log)
    }

    /// Write the inventory to the configured snapshot file
    ///
    /// Returns the number of items written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if no snapshot path is configured, or an
    /// I/O or encoding error from the snapshot writer.
    pub fn save(&self) -> Result<usize> {
        let path = self
            .config
            .snapshot_path()
            .ok_or_else(|| Error::Config("no snapshot path configured".to_string()))?;
        let state = self.state.lock();
        snapshot::save(path, &state.inventory)
    }

    /// Current inventory in list order
    pub fn items(&self) -> Vec<Item> {
        self.state.lock().inventory.items()
    }

    /// Items whose title or course code contains `query` (ignoring case)
    pub fn search(&self, query: &str) -> Vec<Item> {
        let state = self.state.lock();
        state.inventory.search(query).into_iter().cloned().collect()
    }

    /// Remove a specific listing (title, course code, and seller must match)
    pub fn remove_item(&self, item: &Item) -> bool {
        self.state.lock().inventory.remove_exact(item)
    }

    /// Pending requests in submission order
    pub fn pending_requests(&self) -> Vec<Request> {
        self.state.lock().requests.pending().to_vec()
    }

    /// Withdraw a pending request
    pub fn withdraw_request(&self, id: SubmissionId) -> Option<Request> {
        self.state.lock().requests.withdraw(id)
    }

    /// Matching totals since the exchange was created
    pub fn stats(&self) -> MatchStats {
        self.state.lock().engine.stats()
    }

    /// The configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn parse_urgency(&self, raw: &str) -> Result<Urgency> {
        let range = self.config.urgency_range();
        let out_of_range = || {
            Error::invalid(
                "urgency",
                format!(
                    "must be a whole number between {} and {}",
                    range.start(),
                    range.end()
                ),
            )
        };
        let urgency: Urgency = required("urgency", raw)?
            .parse()
            .map_err(|_| out_of_range())?;
        if range.contains(&urgency) {
            Ok(urgency)
        } else {
            Err(out_of_range())
        }
    }
}

fn required<'a>(field: &'static str, raw: &'a str) -> Result<&'a str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err(Error::invalid(field, "must not be empty"))
    } else {
        Ok(trimmed)
    }
}

/// A required field that can also be written to a snapshot line
fn storable<'a>(field: &'static str, raw: &'a str) -> Result<&'a str> {
    let value = required(field, raw)?;
    if value.contains([snapshot::SEPARATOR, '\n', '\r']) {
        return Err(Error::invalid(
            field,
            format!("must not contain {:?} or a line break", snapshot::SEPARATOR),
        ));
    }
    Ok(value)
}

fn parse_price(raw: &str) -> Result<Price> {
    let raw = required("price", raw)?;
    let price = Price::from_str(raw)
        .map_err(|e| Error::invalid("price", format!("{raw:?} is not a number ({e})")))?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err(Error::invalid("price", "must not be negative"));
    }
    Ok(price)
}
