//! Writing instructions back to content stream bytes.
//!
//! Each instruction goes on its own line: operands separated by single
//! spaces, then the operator. Inline images are written as
//!
//! ```text
//! BI
//! /W 4 /H 4 /BPC 8 /CS /G
//! ID
//! <raw data>
//! EI
//! ```

use crate::content::operators::{Instruction, Operand};
use crate::content::tokenizer::find_inline_image_end;
use crate::error::{Error, Result};
use crate::object::Object;
use crate::writer::ObjectSerializer;
use std::io::Write;

/// Serialize instructions into content stream bytes.
///
/// Parsing the output yields the same instructions.
///
/// # Errors
///
/// [`Error::Unparse`] wrapping the underlying cause when an operand or
/// operator cannot be written: references and streams, non-finite reals,
/// misplaced inline images, or an operator that would not lex back as itself.
///
/// # Examples
///
/// ```
/// use pdf_content_codec::content::{unparse_content_stream, Instruction};
/// use pdf_content_codec::Object;
///
/// let instructions = vec![
///     Instruction::with_objects(vec![], "q"),
///     Instruction::with_objects(vec![Object::Integer(2)], "w"),
///     Instruction::with_objects(vec![], "Q"),
/// ];
/// assert_eq!(unparse_content_stream(&instructions)?, b"q\n2 w\nQ\n");
/// # Ok::<(), pdf_content_codec::error::Error>(())
/// ```
pub fn unparse_content_stream(instructions: &[Instruction]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let serializer = ObjectSerializer::content();
    for instruction in instructions {
        write_instruction(&serializer, &mut out, instruction).map_err(Error::unparse)?;
    }
    Ok(out)
}

fn write_instruction<W: Write>(
    serializer: &ObjectSerializer,
    w: &mut W,
    instruction: &Instruction,
) -> Result<()> {
    if instruction.is_inline_image() {
        return match instruction.operands.as_slice() {
            [Operand::InlineImage(image)] => {
                w.write_all(b"BI\n")?;
                for (i, (key, value)) in image.params().iter().enumerate() {
                    if i > 0 {
                        w.write_all(b" ")?;
                    }
                    serializer.write_object(w, &Object::Name(key.clone()))?;
                    w.write_all(b" ")?;
                    serializer.write_object(w, value)?;
                }
                w.write_all(b"\nID\n")?;
                write_image_data(w, image.data())?;
                w.write_all(b"\nEI\n")?;
                Ok(())
            },
            operands => Err(Error::Unsupported(format!(
                "inline image instruction needs exactly one inline image operand, got {}",
                operands.len()
            ))),
        };
    }

    if !instruction.operator.is_writable() {
        return Err(Error::Unsupported(format!(
            "invalid operator {:?}",
            instruction.operator
        )));
    }

    for operand in &instruction.operands {
        match operand {
            Operand::Object(obj) => serializer.write_object(w, obj)?,
            Operand::InlineImage(_) => {
                return Err(Error::Unsupported(format!(
                    "inline image operand for operator {}",
                    instruction.operator
                )))
            },
        }
        w.write_all(b" ")?;
    }
    w.write_all(instruction.operator.as_bytes())?;
    w.write_all(b"\n")?;
    Ok(())
}

/// Write image data, refusing data that would end the image early on reparse.
fn write_image_data<W: Write>(w: &mut W, data: &[u8]) -> Result<()> {
    let mut framed = Vec::with_capacity(data.len() + 5);
    framed.push(b'\n');
    framed.extend_from_slice(data);
    framed.extend_from_slice(b"\nEI\n");

    if find_inline_image_end(&framed, 1) != Some(data.len() + 2) {
        return Err(Error::Unsupported(
            "inline image data contains an EI delimiter".to_string(),
        ));
    }
    w.write_all(data)?;
    Ok(())
}
