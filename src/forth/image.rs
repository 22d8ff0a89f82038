use serde::{Deserialize, Serialize};

use super::{
    error::{ForthError, ForthResult},
    intern::Interner,
    runtime::Runtime,
    token::Token,
    vm::{Opcode, Program},
};

/// Compiled instructions plus the strings they refer to. Stacks are not part
/// of an image: loading one always starts from empty stacks.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Default)]
pub struct Image {
    pub strings: Vec<String>,
    pub instructions: Vec<Opcode>,
}

fn validate(interner: &Interner, instructions: &[Opcode]) -> ForthResult<()> {
    let len = instructions.len();
    for (idx, op) in instructions.iter().enumerate() {
        match op {
            Opcode::PushLiteral(Token::Symbol(id)) if !interner.contains(*id) => {
                return Err(ForthError::Image(format!(
                    "instruction {idx} refers to unknown string {id}"
                )));
            }
            Opcode::CallFunction(target) if *target > len => {
                return Err(ForthError::Image(format!(
                    "instruction {idx} jumps to {target}, past the end"
                )));
            }
            _ => {}
        }
    }
    match instructions.last() {
        None | Some(Opcode::EndOfProgram) => Ok(()),
        Some(_) => Err(ForthError::Image(
            "last batch is not terminated".to_string(),
        )),
    }
}

impl<RT> Program<RT>
where
    RT: Runtime,
{
    pub fn to_image(&self) -> Image {
        Image {
            strings: self.interner().strings().to_vec(),
            instructions: self.instructions().to_vec(),
        }
    }

    pub fn from_image(image: Image, runtime: RT) -> ForthResult<Self> {
        let interner = Interner::from_strings(image.strings);
        validate(&interner, &image.instructions)?;
        forth_info!(
            "loaded image: {} strings, {} instructions",
            interner.len(),
            image.instructions.len()
        );
        Ok(Self::with_parts(interner, image.instructions, runtime))
    }
}

pub fn to_bytes(image: &Image) -> ForthResult<Vec<u8>> {
    postcard::to_allocvec_cobs(image).map_err(|e| ForthError::Image(e.to_string()))
}

/// Decodes a COBS framed image in place.
pub fn from_bytes(bytes: &mut [u8]) -> ForthResult<Image> {
    postcard::from_bytes_cobs(bytes).map_err(|e| ForthError::Image(e.to_string()))
}
