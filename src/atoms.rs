use x11rb::connection::Connection;
use x11rb::errors::ReplyError;
use x11rb::protocol::xproto;
use x11rb::protocol::xproto::ConnectionExt;

#[allow(non_snake_case)]
#[derive(Debug)]
pub struct Atoms {
    pub UTF8_STRING: xproto::Atom,
    pub WM_DELETE_WINDOW: xproto::Atom,
    pub WM_PROTOCOLS: xproto::Atom,
    pub _NET_WM_NAME: xproto::Atom,
    pub _NET_WM_WINDOW_TYPE: xproto::Atom,
    pub _NET_WM_WINDOW_TYPE_DOCK: xproto::Atom,
}

impl Atoms {
    pub fn new<Connection: self::Connection>(connection: &Connection) -> Result<Self, ReplyError> {
        Ok(Self {
            UTF8_STRING: new_atom(connection, "UTF8_STRING")?,
            WM_DELETE_WINDOW: new_atom(connection, "WM_DELETE_WINDOW")?,
            WM_PROTOCOLS: new_atom(connection, "WM_PROTOCOLS")?,
            _NET_WM_NAME: new_atom(connection, "_NET_WM_NAME")?,
            _NET_WM_WINDOW_TYPE: new_atom(connection, "_NET_WM_WINDOW_TYPE")?,
            _NET_WM_WINDOW_TYPE_DOCK: new_atom(connection, "_NET_WM_WINDOW_TYPE_DOCK")?,
        })
    }
}

#[inline]
fn new_atom<Connection: self::Connection>(
    connection: &Connection,
    name: &str,
) -> Result<xproto::Atom, ReplyError> {
    let reply = connection.intern_atom(false, name.as_bytes())?.reply()?;
    Ok(reply.atom)
}
