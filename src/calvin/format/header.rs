//! Generic data headers and their parameter blocks.
//!
//! The same record layout is reused for the top-level header, every parent
//! header and every extra-block entry:
//!
//! ```text
//! [byte string] uid
//! [byte string] guid
//! [wide string] timestamp
//! [wide string] locale
//! [i32 count] then count x ([wide string] name, [byte string] raw value, [wide string] type tag)
//! ```

use std::collections::HashMap;
use std::io::{Read, Seek};
use log::{trace, warn};

use crate::calvin::codec::{byte_reader::ByteReader, text, value};
use crate::calvin::types::{
    error::{Diagnostic, Result},
    models::{DataHeader, Parameter},
};

/// Smallest encoding of a parameter: three empty length prefixes.
const MIN_PARAMETER_SIZE: u64 = 12;

/// Smallest encoding of a generic header: four empty strings and a zero count.
const MIN_HEADER_SIZE: u64 = 20;

/// Reads one `(name, raw value, type tag)` triple and coerces the value.
///
/// Unrecognized tags keep the raw bytes and record a diagnostic.
pub fn parse_parameter<R: Read + Seek>(
    reader: &mut ByteReader<R>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Parameter> {
    let name = text::read_wide_string(reader)?.unwrap_or_default();
    let value_offset = reader.position();
    let raw = text::read_byte_string(reader)?;
    let type_tag = text::read_wide_string(reader)?.unwrap_or_default();

    let tag = value::TypeTag::parse(&type_tag);
    if tag.is_none() {
        warn!("Parameter '{}' has unrecognized type tag '{}'; keeping raw bytes", name, type_tag);
        diagnostics.push(Diagnostic::UnrecognizedTypeTag {
            parameter: name.clone(),
            type_tag: type_tag.clone(),
        });
    }
    let value = value::coerce(raw, tag, value_offset)?;
    trace!("Parameter '{}' ({}) = {:?}", name, type_tag, value);

    Ok(Parameter {
        name,
        type_tag,
        value,
    })
}

/// Reads a counted parameter block into a name-keyed map.
///
/// Later parameters overwrite earlier ones with the same name.
pub fn parse_parameters<R: Read + Seek>(
    reader: &mut ByteReader<R>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<HashMap<String, Parameter>> {
    let count = reader.read_count("parameter", MIN_PARAMETER_SIZE)?;
    let mut parameters = HashMap::with_capacity(count);
    for _ in 0..count {
        let parameter = parse_parameter(reader, diagnostics)?;
        parameters.insert(parameter.name.clone(), parameter);
    }
    Ok(parameters)
}

/// Reads one generic data header at the current position.
pub fn parse<R: Read + Seek>(
    reader: &mut ByteReader<R>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<DataHeader> {
    let uid = text::read_utf8_string(reader)?;
    let guid = text::read_utf8_string(reader)?;
    let timestamp = text::read_wide_string(reader)?;
    let locale = text::read_wide_string(reader)?;
    let parameters = parse_parameters(reader, diagnostics)?;
    trace!("Data header uid={:?}, {} parameters", uid, parameters.len());

    Ok(DataHeader {
        uid,
        guid,
        timestamp,
        locale,
        parameters,
    })
}

/// Reads a counted list of independent generic headers (parent block, extra block).
pub fn parse_list<R: Read + Seek>(
    reader: &mut ByteReader<R>,
    context: &'static str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Vec<DataHeader>> {
    let count = reader.read_count(context, MIN_HEADER_SIZE)?;
    (0..count).map(|_| parse(reader, diagnostics)).collect()
}
