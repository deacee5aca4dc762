//! Placement transforms and their decomposition.
//!
//! Every node and the root container carry an [`Affine`] placement. The
//! diagram only ever writes pure translations (and translate+scale for the
//! root). Placements format to SVG transform-list syntax, and the
//! `matrix`, `translate` and `scale` functions parse back.

use std::fmt;
use std::str::FromStr;

use log::debug;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
	#[error("unknown transform function `{0}`")]
	UnknownFunction(String),

	#[error("`{function}` does not take {count} argument(s)")]
	Arity { function: String, count: usize },

	#[error("invalid number `{0}`")]
	InvalidNumber(String),

	#[error("syntax error: {0}")]
	Syntax(String),

	#[error("transform is not finite")]
	NonFinite,
}

/// 2D affine matrix in SVG order:
///
/// ```text
/// | a c e |
/// | b d f |
/// | 0 0 1 |
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine {
	pub a: f64,
	pub b: f64,
	pub c: f64,
	pub d: f64,
	pub e: f64,
	pub f: f64,
}

impl Default for Affine {
	fn default() -> Self {
		Self::IDENTITY
	}
}

impl Affine {
	pub const IDENTITY: Affine = Affine {
		a: 1.0,
		b: 0.0,
		c: 0.0,
		d: 1.0,
		e: 0.0,
		f: 0.0,
	};

	pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
		Self { a, b, c, d, e, f }
	}

	pub fn translate(x: f64, y: f64) -> Self {
		Self::new(1.0, 0.0, 0.0, 1.0, x, y)
	}

	pub fn scale(sx: f64, sy: f64) -> Self {
		Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
	}

	/// `self * rhs`: `rhs` is applied to a point first.
	pub fn multiply(&self, rhs: &Affine) -> Affine {
		Affine {
			a: self.a * rhs.a + self.c * rhs.b,
			b: self.b * rhs.a + self.d * rhs.b,
			c: self.a * rhs.c + self.c * rhs.d,
			d: self.b * rhs.c + self.d * rhs.d,
			e: self.a * rhs.e + self.c * rhs.f + self.e,
			f: self.b * rhs.e + self.d * rhs.f + self.f,
		}
	}

	pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
		(
			self.a * x + self.c * y + self.e,
			self.b * x + self.d * y + self.f,
		)
	}

	pub fn invert(&self) -> Option<Affine> {
		let det = self.a * self.d - self.b * self.c;
		if det == 0.0 || !det.is_finite() {
			return None;
		}
		Some(Affine {
			a: self.d / det,
			b: -self.b / det,
			c: -self.c / det,
			d: self.a / det,
			e: (self.c * self.f - self.d * self.e) / det,
			f: (self.b * self.e - self.a * self.f) / det,
		})
	}

	/// The translation terms, ignoring any linear part.
	pub fn translation(&self) -> (f64, f64) {
		(self.e, self.f)
	}

	pub fn is_translation(&self) -> bool {
		self.a == 1.0 && self.b == 0.0 && self.c == 0.0 && self.d == 1.0
	}

	pub fn is_finite(&self) -> bool {
		[self.a, self.b, self.c, self.d, self.e, self.f]
			.iter()
			.all(|v| v.is_finite())
	}
}

impl fmt::Display for Affine {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.is_translation() {
			write!(f, "translate({},{})", self.e, self.f)
		} else {
			write!(
				f,
				"matrix({},{},{},{},{},{})",
				self.a, self.b, self.c, self.d, self.e, self.f
			)
		}
	}
}

impl FromStr for Affine {
	type Err = TransformError;

	/// Parse an SVG transform list and consolidate it into one matrix.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let mut matrix = Affine::IDENTITY;
		let mut rest = s;

		loop {
			rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
			if rest.is_empty() {
				break;
			}

			let name_len = rest
				.find(|c: char| !c.is_ascii_alphabetic())
				.unwrap_or(rest.len());
			if name_len == 0 {
				return Err(TransformError::Syntax(format!(
					"expected a transform function at `{rest}`"
				)));
			}
			let (name, after) = rest.split_at(name_len);

			let after = after.trim_start();
			let Some(after) = after.strip_prefix('(') else {
				return Err(TransformError::Syntax(format!("expected `(` after `{name}`")));
			};
			let Some(close) = after.find(')') else {
				return Err(TransformError::Syntax(format!("unclosed `{name}(`")));
			};
			let (body, after) = after.split_at(close);
			rest = &after[1..];

			let args = parse_args(body)?;
			matrix = matrix.multiply(&function(name, &args)?);
		}

		if !matrix.is_finite() {
			return Err(TransformError::NonFinite);
		}
		Ok(matrix)
	}
}

fn parse_args(body: &str) -> Result<Vec<f64>, TransformError> {
	body.split(|c: char| c == ',' || c.is_whitespace())
		.filter(|t| !t.is_empty())
		.map(|t| {
			t.parse::<f64>()
				.map_err(|_| TransformError::InvalidNumber(t.to_string()))
		})
		.collect()
}

fn function(name: &str, args: &[f64]) -> Result<Affine, TransformError> {
	let arity = || TransformError::Arity {
		function: name.to_string(),
		count: args.len(),
	};

	match name {
		"matrix" => match *args {
			[a, b, c, d, e, f] => Ok(Affine::new(a, b, c, d, e, f)),
			_ => Err(arity()),
		},
		"translate" => match *args {
			[x] => Ok(Affine::translate(x, 0.0)),
			[x, y] => Ok(Affine::translate(x, y)),
			_ => Err(arity()),
		},
		"scale" => match *args {
			[s] => Ok(Affine::scale(s, s)),
			[sx, sy] => Ok(Affine::scale(sx, sy)),
			_ => Err(arity()),
		},
		other => Err(TransformError::UnknownFunction(other.to_string())),
	}
}

/// Translation component of a transform string, or `None` when it cannot be
/// parsed.
pub fn get_translation(transform: &str) -> Option<(f64, f64)> {
	match transform.parse::<Affine>() {
		Ok(matrix) => Some(matrix.translation()),
		Err(err) => {
			debug!("cannot decompose transform {transform:?}: {err}");
			None
		}
	}
}
