//! Declarations for standard-library packages commonly used in struct
//! fields. Only type declarations matter; unexported fields keep the real
//! layouts' visibility so completion never touches them.

pub(crate) fn source(import_path: &str) -> Option<&'static str> {
    Some(match import_path {
        "time" => TIME,
        "sync" => SYNC,
        "context" => CONTEXT,
        "io" => IO,
        "bytes" => BYTES,
        "strings" => STRINGS,
        "net/url" => NET_URL,
        "net/http" => NET_HTTP,
        "encoding/json" => ENCODING_JSON,
        "database/sql" => DATABASE_SQL,
        "os" => OS,
        "fmt" => FMT,
        "errors" => ERRORS,
        "unsafe" => UNSAFE,
        _ => return None,
    })
}

const TIME: &str = r#"package time

type Time struct {
	wall uint64
	ext  int64
	loc  *Location
}

type Location struct {
	name string
}

type Duration int64

type Month int

type Weekday int

type Timer struct {
	C <-chan Time
	r runtimeTimer
}

type Ticker struct {
	C <-chan Time
	r runtimeTimer
}

type runtimeTimer struct {
	when int64
}
"#;

const SYNC: &str = r#"package sync

type Mutex struct {
	state int32
	sema  uint32
}

type RWMutex struct {
	w           Mutex
	writerSem   uint32
	readerSem   uint32
	readerCount int32
	readerWait  int32
}

type WaitGroup struct {
	state uint64
	sema  uint32
}

type Once struct {
	done uint32
	m    Mutex
}

type Map struct {
	mu Mutex
}

type Locker interface {
	Lock()
	Unlock()
}
"#;

const CONTEXT: &str = r#"package context

import "time"

type Context interface {
	Deadline() (deadline time.Time, ok bool)
	Done() <-chan struct{}
	Err() error
	Value(key any) any
}

type CancelFunc func()
"#;

const IO: &str = r#"package io

type Reader interface {
	Read(p []byte) (n int, err error)
}

type Writer interface {
	Write(p []byte) (n int, err error)
}

type Closer interface {
	Close() error
}

type ReadCloser interface {
	Reader
	Closer
}

type WriteCloser interface {
	Writer
	Closer
}

type ReadWriter interface {
	Reader
	Writer
}
"#;

const BYTES: &str = r#"package bytes

type Buffer struct {
	buf      []byte
	off      int
	lastRead int8
}
"#;

const STRINGS: &str = r#"package strings

type Builder struct {
	addr *Builder
	buf  []byte
}
"#;

const NET_URL: &str = r#"package url

type URL struct {
	Scheme      string
	Opaque      string
	User        *Userinfo
	Host        string
	Path        string
	RawPath     string
	OmitHost    bool
	ForceQuery  bool
	RawQuery    string
	Fragment    string
	RawFragment string
}

type Userinfo struct {
	username    string
	password    string
	passwordSet bool
}

type Values map[string][]string
"#;

const NET_HTTP: &str = r#"package http

import (
	"net/url"
	"time"
)

type Header map[string][]string

type Handler interface {
	ServeHTTP(ResponseWriter, *Request)
}

type HandlerFunc func(ResponseWriter, *Request)

type ResponseWriter interface {
	Header() Header
	Write([]byte) (int, error)
	WriteHeader(statusCode int)
}

type RoundTripper interface {
	RoundTrip(*Request) (*Response, error)
}

type CookieJar interface {
	Cookies(u *url.URL) []*Cookie
}

type Client struct {
	Transport     RoundTripper
	CheckRedirect func(req *Request, via []*Request) error
	Jar           CookieJar
	Timeout       time.Duration
}

type Cookie struct {
	Name     string
	Value    string
	Path     string
	Domain   string
	Expires  time.Time
	MaxAge   int
	Secure   bool
	HttpOnly bool
}

type Request struct {
	Method string
	URL    *url.URL
	Header Header
	Host   string
	ctx    any
}

type Response struct {
	Status     string
	StatusCode int
	Header     Header
	Request    *Request
}

type Server struct {
	Addr              string
	Handler           Handler
	ReadTimeout       time.Duration
	ReadHeaderTimeout time.Duration
	WriteTimeout      time.Duration
	IdleTimeout       time.Duration
	MaxHeaderBytes    int
	mu                any
}
"#;

const ENCODING_JSON: &str = r#"package json

type RawMessage []byte

type Number string

type Marshaler interface {
	MarshalJSON() ([]byte, error)
}
"#;

const DATABASE_SQL: &str = r#"package sql

import "time"

type NullString struct {
	String string
	Valid  bool
}

type NullInt64 struct {
	Int64 int64
	Valid bool
}

type NullInt32 struct {
	Int32 int32
	Valid bool
}

type NullBool struct {
	Bool  bool
	Valid bool
}

type NullFloat64 struct {
	Float64 float64
	Valid   bool
}

type NullTime struct {
	Time  time.Time
	Valid bool
}

type DB struct {
	connector any
}
"#;

const OS: &str = r#"package os

type File struct {
	file any
}

type FileMode uint32

type Signal interface {
	String() string
	Signal()
}
"#;

const FMT: &str = r#"package fmt

type Stringer interface {
	String() string
}
"#;

const ERRORS: &str = "package errors\n";

const UNSAFE: &str = "package unsafe\n";
