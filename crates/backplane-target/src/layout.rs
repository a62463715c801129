//! Data layout model.
//!
//! Describes how a target lays out memory: byte order, pointer width and
//! alignment, integer alignments, native integer widths, and stack
//! alignment. Layouts render to and parse from the conventional
//! dash-separated specification string, e.g. `E-m:e-p:64:64-i64:64-n64-S64`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TargetError};

/// Byte ordering of the target architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Endianness {
    Little,
    Big,
}

/// Symbol mangling scheme of the object format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mangling {
    /// ELF: private symbols get a `.L` prefix.
    Elf,
    /// Mach-O: private symbols get `L`, globals get `_`.
    MachO,
    /// COFF: private symbols get `.L`, globals get `_` on 32-bit.
    Coff,
    /// MIPS style: private symbols get `$`.
    Mips,
}

impl Mangling {
    fn code(self) -> char {
        match self {
            Self::Elf => 'e',
            Self::MachO => 'o',
            Self::Coff => 'w',
            Self::Mips => 'm',
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "e" => Some(Self::Elf),
            "o" => Some(Self::MachO),
            "w" => Some(Self::Coff),
            "m" => Some(Self::Mips),
            _ => None,
        }
    }
}

/// Pointer size and alignment for the default address space, in bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PointerSpec {
    pub size_bits: u32,
    pub abi_align_bits: u32,
    /// Preferred alignment, when it differs from the ABI alignment.
    pub pref_align_bits: Option<u32>,
}

/// ABI alignment of one scalar width, in bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ScalarAlign {
    pub width_bits: u32,
    pub abi_align_bits: u32,
}

/// A target data layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DataLayout {
    endianness: Endianness,
    mangling: Option<Mangling>,
    pointer: PointerSpec,
    int_aligns: Vec<ScalarAlign>,
    float_aligns: Vec<ScalarAlign>,
    native_ints: Vec<u32>,
    stack_align_bits: Option<u32>,
}

impl DataLayout {
    /// A layout with the given byte order and pointer width, naturally aligned.
    pub fn new(endianness: Endianness, pointer_bits: u32) -> Self {
        Self {
            endianness,
            mangling: None,
            pointer: PointerSpec {
                size_bits: pointer_bits,
                abi_align_bits: pointer_bits,
                pref_align_bits: None,
            },
            int_aligns: Vec::new(),
            float_aligns: Vec::new(),
            native_ints: Vec::new(),
            stack_align_bits: None,
        }
    }

    pub fn with_mangling(mut self, mangling: Mangling) -> Self {
        self.mangling = Some(mangling);
        self
    }

    pub fn with_int_align(mut self, width_bits: u32, abi_align_bits: u32) -> Self {
        set_align(&mut self.int_aligns, width_bits, abi_align_bits);
        self
    }

    pub fn with_float_align(mut self, width_bits: u32, abi_align_bits: u32) -> Self {
        set_align(&mut self.float_aligns, width_bits, abi_align_bits);
        self
    }

    pub fn with_native_ints(mut self, widths: &[u32]) -> Self {
        self.native_ints = widths.to_vec();
        self
    }

    pub fn with_stack_align(mut self, bits: u32) -> Self {
        self.stack_align_bits = Some(bits);
        self
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    pub fn is_big_endian(&self) -> bool {
        self.endianness == Endianness::Big
    }

    pub fn mangling(&self) -> Option<Mangling> {
        self.mangling
    }

    pub fn pointer(&self) -> PointerSpec {
        self.pointer
    }

    pub fn pointer_size_bytes(&self) -> u32 {
        self.pointer.size_bits / 8
    }

    pub fn native_int_widths(&self) -> &[u32] {
        &self.native_ints
    }

    /// Whether `width_bits` is a native integer width of the target.
    pub fn is_legal_integer(&self, width_bits: u32) -> bool {
        self.native_ints.contains(&width_bits)
    }

    /// Natural stack alignment in bits, if the layout states one.
    pub fn stack_align_bits(&self) -> Option<u32> {
        self.stack_align_bits
    }

    /// ABI alignment of an integer of `width_bits`.
    ///
    /// Uses the exact entry if present, else the next wider entry, else the
    /// widest entry, else natural alignment.
    pub fn int_abi_align_bits(&self, width_bits: u32) -> u32 {
        if let Some(a) = self.int_aligns.iter().find(|a| a.width_bits == width_bits) {
            return a.abi_align_bits;
        }
        let wider = self
            .int_aligns
            .iter()
            .filter(|a| a.width_bits > width_bits)
            .min_by_key(|a| a.width_bits);
        if let Some(a) = wider {
            return a.abi_align_bits;
        }
        if let Some(a) = self.int_aligns.iter().max_by_key(|a| a.width_bits) {
            return a.abi_align_bits;
        }
        width_bits.next_power_of_two().max(8)
    }
}

fn set_align(list: &mut Vec<ScalarAlign>, width_bits: u32, abi_align_bits: u32) {
    match list.iter_mut().find(|a| a.width_bits == width_bits) {
        Some(a) => a.abi_align_bits = abi_align_bits,
        None => list.push(ScalarAlign {
            width_bits,
            abi_align_bits,
        }),
    }
}

impl fmt::Display for DataLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = vec![match self.endianness {
            Endianness::Big => "E".to_string(),
            Endianness::Little => "e".to_string(),
        }];
        if let Some(m) = self.mangling {
            parts.push(format!("m:{}", m.code()));
        }
        let p = self.pointer;
        match p.pref_align_bits {
            Some(pref) => parts.push(format!("p:{}:{}:{}", p.size_bits, p.abi_align_bits, pref)),
            None => parts.push(format!("p:{}:{}", p.size_bits, p.abi_align_bits)),
        }
        for a in &self.int_aligns {
            parts.push(format!("i{}:{}", a.width_bits, a.abi_align_bits));
        }
        for a in &self.float_aligns {
            parts.push(format!("f{}:{}", a.width_bits, a.abi_align_bits));
        }
        if !self.native_ints.is_empty() {
            let widths: Vec<String> = self.native_ints.iter().map(u32::to_string).collect();
            parts.push(format!("n{}", widths.join(":")));
        }
        if let Some(s) = self.stack_align_bits {
            parts.push(format!("S{s}"));
        }
        f.write_str(&parts.join("-"))
    }
}

impl FromStr for DataLayout {
    type Err = TargetError;

    fn from_str(input: &str) -> Result<Self> {
        let invalid = |detail: String| TargetError::InvalidDataLayout {
            input: input.to_string(),
            detail,
        };
        let num = |s: &str| -> Result<u32> {
            s.parse::<u32>()
                .map_err(|_| invalid(format!("'{s}' is not a number")))
        };

        let mut layout = DataLayout::new(Endianness::Little, 64);
        for spec in input.split('-').filter(|s| !s.is_empty()) {
            let mut chars = spec.chars();
            let head = chars.next().unwrap_or('-');
            let rest = chars.as_str();
            match head {
                'E' if rest.is_empty() => layout.endianness = Endianness::Big,
                'e' if rest.is_empty() => layout.endianness = Endianness::Little,
                'm' => {
                    let code = rest.strip_prefix(':').unwrap_or(rest);
                    layout.mangling = Some(
                        Mangling::from_code(code)
                            .ok_or_else(|| invalid(format!("unknown mangling '{code}'")))?,
                    );
                }
                'p' => {
                    let digits = rest
                        .find(|c: char| !c.is_ascii_digit())
                        .unwrap_or(rest.len());
                    let (space, rest) = rest.split_at(digits);
                    if !space.is_empty() && num(space)? != 0 {
                        return Err(invalid(format!(
                            "address space {space} is not supported, only the default (0)"
                        )));
                    }
                    let fields: Vec<&str> = match rest.strip_prefix(':') {
                        Some(fields) => fields.split(':').collect(),
                        None => return Err(invalid(format!("malformed pointer spec '{spec}'"))),
                    };
                    if fields.len() < 2 || fields.len() > 3 {
                        return Err(invalid(format!("malformed pointer spec '{spec}'")));
                    }
                    layout.pointer = PointerSpec {
                        size_bits: num(fields[0])?,
                        abi_align_bits: num(fields[1])?,
                        pref_align_bits: fields.get(2).map(|s| num(*s)).transpose()?,
                    };
                }
                'i' | 'f' => {
                    let (width, align) = rest
                        .split_once(':')
                        .ok_or_else(|| invalid(format!("malformed alignment spec '{spec}'")))?;
                    // A trailing preferred alignment is accepted and dropped.
                    let abi = align.split(':').next().unwrap_or(align);
                    let list = if head == 'i' {
                        &mut layout.int_aligns
                    } else {
                        &mut layout.float_aligns
                    };
                    set_align(list, num(width)?, num(abi)?);
                }
                'n' => {
                    layout.native_ints = rest.split(':').map(|s| num(s)).collect::<Result<_>>()?;
                }
                'S' => layout.stack_align_bits = Some(num(rest)?),
                _ => return Err(invalid(format!("unrecognized specification '{spec}'"))),
            }
        }
        Ok(layout)
    }
}

impl TryFrom<String> for DataLayout {
    type Error = TargetError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<DataLayout> for String {
    fn from(layout: DataLayout) -> Self {
        layout.to_string()
    }
}
