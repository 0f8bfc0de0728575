//! Line-oriented driver for the self-sorting list.
//!
//! Non-empty input lines are chunked and pushed; an empty line prints the
//! current contents; end of input shuts the list down and reports the number
//! of swaps performed.

pub mod cli;
pub mod driver;
