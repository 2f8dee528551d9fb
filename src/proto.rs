//! Serialization of the multi request and response payloads, for transports
//! that speak the ZooKeeper framing. The transaction layer itself only deals
//! in [`Op`] and [`OpResult`]; a connection implementation encodes and
//! decodes with what is defined here.

use std::io::{Error, ErrorKind, Read, Result, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::acl::{Acl, Permission};
use crate::consts::ZkError;
use crate::data::Stat;
use crate::multi::{Op, OpKind, OpResult};

/// Operation code a batch entry is tagged with on the wire. Response entries
/// reuse the code of the operation they answer; `Error` tags both rejected
/// entries and the header closing a response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpCode {
    Error = -1,
    Create = 1,
    Delete = 2,
    SetData = 5,
    Check = 13,
    /// The code a session layer tags the enclosing request with.
    Transaction = 14,
}

fn op_code(op: &Op) -> OpCode {
    match op.kind() {
        OpKind::Check => OpCode::Check,
        OpKind::Create => OpCode::Create,
        OpKind::Delete => OpCode::Delete,
        OpKind::SetData => OpCode::SetData,
    }
}

pub trait ReadFrom: Sized {
    fn read_from<R: Read>(read: &mut R) -> Result<Self>;
}

pub trait WriteTo {
    fn write_to(&self, writer: &mut dyn Write) -> Result<()>;

    fn to_len_prefixed_buf(&self) -> Result<Vec<u8>> {
        let mut body = Vec::new();
        self.write_to(&mut body)?;
        let mut buf = Vec::with_capacity(body.len() + 4);
        buf.write_i32::<BigEndian>(body.len() as i32)?;
        buf.extend_from_slice(&body);
        Ok(buf)
    }
}

fn error(msg: &str) -> Error {
    Error::new(ErrorKind::InvalidInput, msg)
}

trait StringReader: Read {
    fn read_string(&mut self) -> Result<String>;
}

pub trait BufferReader: Read {
    fn read_buffer(&mut self) -> Result<Vec<u8>>;
}

impl<R: Read> StringReader for R {
    fn read_string(&mut self) -> Result<String> {
        let raw = self.read_buffer()?;
        String::from_utf8(raw).map_err(|_| error("non-utf8 string"))
    }
}

// A buffer is a u8 string prefixed with its length as i32
impl<R: Read> BufferReader for R {
    fn read_buffer(&mut self) -> Result<Vec<u8>> {
        let len = self.read_i32::<BigEndian>()?;
        let len = if len < 0 { 0 } else { len as usize };
        let mut buf = vec![0; len];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }
}

impl WriteTo for u8 {
    fn write_to(&self, writer: &mut dyn Write) -> Result<()> {
        writer.write_u8(*self)?;
        Ok(())
    }
}

impl WriteTo for String {
    fn write_to(&self, writer: &mut dyn Write) -> Result<()> {
        writer.write_i32::<BigEndian>(self.len() as i32)?;
        writer.write_all(self.as_ref())
    }
}

impl<T: WriteTo> WriteTo for Vec<T> {
    fn write_to(&self, writer: &mut dyn Write) -> Result<()> {
        writer.write_i32::<BigEndian>(self.len() as i32)?;
        for elem in self.iter() {
            elem.write_to(writer)?;
        }
        Ok(())
    }
}

impl ReadFrom for Acl {
    fn read_from<R: Read>(read: &mut R) -> Result<Acl> {
        Ok(Acl {
            perms: Permission::from_raw(read.read_u32::<BigEndian>()?),
            scheme: read.read_string()?,
            id: read.read_string()?,
        })
    }
}

impl WriteTo for Acl {
    fn write_to(&self, writer: &mut dyn Write) -> Result<()> {
        writer.write_u32::<BigEndian>(self.perms.code())?;
        self.scheme.write_to(writer)?;
        self.id.write_to(writer)
    }
}

impl ReadFrom for Stat {
    fn read_from<R: Read>(read: &mut R) -> Result<Stat> {
        Ok(Stat {
            czxid: read.read_i64::<BigEndian>()?,
            mzxid: read.read_i64::<BigEndian>()?,
            ctime: read.read_i64::<BigEndian>()?,
            mtime: read.read_i64::<BigEndian>()?,
            version: read.read_i32::<BigEndian>()?,
            cversion: read.read_i32::<BigEndian>()?,
            aversion: read.read_i32::<BigEndian>()?,
            ephemeral_owner: read.read_i64::<BigEndian>()?,
            data_length: read.read_i32::<BigEndian>()?,
            num_children: read.read_i32::<BigEndian>()?,
            pzxid: read.read_i64::<BigEndian>()?,
        })
    }
}

pub struct TransactionRequest<'a> {
    pub ops: &'a [Op],
}

impl<'a> WriteTo for TransactionRequest<'a> {
    fn write_to(&self, writer: &mut dyn Write) -> Result<()> {
        for op in self.ops {
            // Header for each entry in the multi:
            writer.write_i32::<BigEndian>(op_code(op) as i32)?;
            writer.write_u8(0)?; // "done": this isn't the closing entry
            writer.write_i32::<BigEndian>(-1)?; // "err": we haven't experienced an error

            match op {
                Op::Check { path, version } => {
                    path.write_to(writer)?;
                    writer.write_i32::<BigEndian>(version.unwrap_or(-1))?;
                }
                Op::Create {
                    path,
                    data,
                    acl,
                    mode,
                } => {
                    path.write_to(writer)?;
                    data.write_to(writer)?;
                    acl.write_to(writer)?;
                    writer.write_i32::<BigEndian>(*mode as i32)?;
                }
                Op::Delete { path, version } => {
                    path.write_to(writer)?;
                    writer.write_i32::<BigEndian>(version.unwrap_or(-1))?;
                }
                Op::SetData {
                    path,
                    data,
                    version,
                } => {
                    path.write_to(writer)?;
                    data.write_to(writer)?;
                    writer.write_i32::<BigEndian>(version.unwrap_or(-1))?;
                }
            }
        }

        // Mark end of the batch with this thing that looks like the per-entry header
        writer.write_i32::<BigEndian>(-1)?;
        writer.write_u8(1)?;
        writer.write_i32::<BigEndian>(-1)?;

        Ok(())
    }
}

pub struct TransactionResponse {
    pub responses: Vec<OpResult>,
}

fn read_multi_header<R: Read>(reader: &mut R) -> Result<(i32, bool, i32)> {
    let type_code = reader.read_i32::<BigEndian>()?;
    let done = reader.read_u8()?;
    let err = reader.read_i32::<BigEndian>()?;

    Ok((type_code, done != 0, err))
}

impl ReadFrom for TransactionResponse {
    fn read_from<R: Read>(reader: &mut R) -> Result<TransactionResponse> {
        let mut responses = Vec::new();
        loop {
            // The closing entry is header-shaped with its type set to -1, so
            // `done` must be checked before the type is interpreted.
            let (type_code, done, _err) = read_multi_header(reader)?;
            if done {
                break;
            }

            let entry = match type_code {
                c if c == OpCode::Error as i32 => {
                    OpResult::Error(ZkError::from(reader.read_i32::<BigEndian>()?))
                }
                c if c == OpCode::Check as i32 || c == OpCode::Delete as i32 => OpResult::Ack,
                c if c == OpCode::SetData as i32 => OpResult::SetData {
                    stat: Stat::read_from(reader)?,
                },
                c if c == OpCode::Create as i32 => OpResult::Create {
                    path: reader.read_string()?,
                },
                c => {
                    return Err(Error::new(
                        ErrorKind::InvalidInput,
                        format!("received unknown multi response code {}", c),
                    ))
                }
            };
            responses.push(entry);
        }
        Ok(TransactionResponse { responses })
    }
}
